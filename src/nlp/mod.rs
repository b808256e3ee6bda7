//! Deterministic text collaborators: normalization, input validation,
//! keyword classification and argument extraction.

pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod validator;

pub use classifier::{refine_confidence, Classifier, KeywordClassifier};
pub use extractor::{ArgumentExtractor, HeuristicExtractor};
pub use validator::{InputValidator, RejectReason, Validation};
