pub mod award;
pub mod commands;
pub mod criteria;
pub mod filter;
pub mod geo;
pub mod naics;
pub mod set_aside;

pub use award::AwardRecord;
pub use criteria::{Certification, SearchCriteria, VeteranStatus};
pub use filter::{QueryFilter, TimeWindow};
pub use geo::LocationTier;
pub use naics::{CodeLevel, CodeSuggestion, InvalidIndustryCode, NormalizedCode};
