// Translation module.
// Language detection, bounded memo caches and the translation endpoint client.

pub mod cache;
pub mod detect;
pub mod translator;

pub use cache::{MemoCache, TranslationCache};
pub use detect::{ENGLISH, JAPANESE, TURKISH, detect_language};
pub use translator::{TranslatedRecipe, Translator};
