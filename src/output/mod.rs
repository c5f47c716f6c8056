//! Output actions on the translated text: copy to clipboard and speak aloud.
//!
//! Both are fire-and-forget from the user's point of view: the session calls
//! them and swallows any error (logged, never shown).  They sit behind small
//! traits so the session can be tested without a desktop clipboard or a
//! speech synthesiser.
//!
//! # Usage
//!
//! ```no_run
//! use live_translate::output::{ClipboardWriter, SystemClipboard};
//!
//! SystemClipboard.write_text("hola").expect("clipboard unavailable");
//! ```

pub mod clipboard;
pub mod speech;

pub use clipboard::{ClipboardWriter, SystemClipboard};
pub use speech::{
    parse_say_voices, voice_for_locale, CommandSpeaker, SayVoice, Speaker, SpeechBackend,
    SpeechCommand, SPEECH_RATE,
};

use thiserror::Error;

// ---------------------------------------------------------------------------
// OutputError
// ---------------------------------------------------------------------------

/// All errors that can surface from an output action.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Could not open the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// The speech synthesiser process could not be started.
    #[error("cannot start speech synthesiser `{program}`: {source}")]
    SpeechSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
