//! Query analysis: SIMPLE/COMPLEX classification and decomposition.
//!
//! # Example
//!
//! ```
//! use broker_domain::analysis::{QueryDecomposer, QueryKind, QueryClassifier};
//! use broker_domain::context::ConversationContext;
//!
//! let ctx = ConversationContext::default();
//! let kind = QueryClassifier::new().classify("Compare Python and Java", &ctx);
//! assert_eq!(kind, QueryKind::Complex);
//!
//! let parts = QueryDecomposer::new().decompose("Compare Python and Java");
//! assert_eq!(parts.len(), 3);
//! assert_eq!(parts[2].text(), "Compare Python and Java");
//! ```

pub mod classifier;
pub mod decomposer;

pub use classifier::{ComplexityCue, QueryClassifier, QueryKind};
pub use decomposer::{QueryDecomposer, SubQuery};
