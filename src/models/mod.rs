pub mod form;
pub mod loaders;
pub mod quiz;
pub mod response;

pub use form::{
    BlockId, DragTarget, OptionId, OptionRow, QuestionBlock, QuizForm, ReorderBinding,
    OPTIONS_PER_QUESTION,
};
pub use loaders::{load_all_drafts, load_draft, QuizDraft};
pub use quiz::{OptionSet, OrderedMap, QuestionSet, Quiz};
pub use response::{SaveOutcome, SaveResponse, SaveTarget};
