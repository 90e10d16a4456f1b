mod draft;
mod insight;
mod profile;
mod record;

pub use draft::SubmissionDraft;
pub use insight::AiInsight;
pub use profile::SubmitterProfile;
pub use record::DevotionalRecord;
