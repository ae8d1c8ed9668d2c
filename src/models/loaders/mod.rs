pub mod toml_loader;

pub use toml_loader::{load_all_drafts, load_draft, parse_draft, DraftQuestion, QuizDraft};
