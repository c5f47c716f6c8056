//! Speech synthesis through the platform's command-line synthesiser.
//!
//! | Platform | Program      | Voice selection        | Rate            |
//! |----------|--------------|------------------------|-----------------|
//! | macOS    | `say`        | `-v <voice>` by locale | `-r` words/min  |
//! | Windows  | `powershell` | System.Speech culture  | SAPI `-10..10`  |
//! | other    | `espeak-ng`  | `-v <lang>`            | `-s` words/min  |
//!
//! `say` has no locale flag, so the voice is picked from the `say -v '?'`
//! listing (queried once per speaker); with no matching voice the system
//! default is used.
//!
//! The synthesiser runs detached; a named reaper thread waits on the child so
//! it does not linger as a zombie.

use std::process::{Command, Stdio};
use std::sync::OnceLock;

use super::OutputError;

/// Speech rate relative to normal, used for the "speak result" action.
pub const SPEECH_RATE: f32 = 0.9;

/// Baseline words per minute of `say` and `espeak-ng`.
const NORMAL_WPM: f32 = 175.0;

/// Something that can read text aloud.
pub trait Speaker: Send + Sync {
    /// Start speaking `text` with the voice for `locale` (BCP-47, e.g.
    /// `"es-ES"`) at `rate` × normal speed.  Returns once speech has started.
    fn speak(&self, text: &str, locale: &str, rate: f32) -> Result<(), OutputError>;
}

// ---------------------------------------------------------------------------
// SpeechBackend / SpeechCommand
// ---------------------------------------------------------------------------

/// Which command-line synthesiser to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechBackend {
    Say,
    PowerShell,
    EspeakNg,
}

/// One entry of the `say -v '?'` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SayVoice {
    pub name: String,
    /// As printed by `say`, e.g. `es_ES`.
    pub locale: String,
}

/// Parse `say -v '?'` output.
///
/// Lines look like `Eddy (Spanish (Spain)) es_ES    # Hola, me llamo Eddy.`;
/// names may contain spaces, the locale is the last token before `#`.
pub fn parse_say_voices(listing: &str) -> Vec<SayVoice> {
    listing
        .lines()
        .filter_map(|line| {
            let entry = line.split('#').next()?.trim_end();
            let (name, locale) = entry.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            let is_locale = locale.contains(|c: char| c == '_' || c == '-')
                && locale
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if name.is_empty() || !is_locale {
                return None;
            }
            Some(SayVoice {
                name: name.to_string(),
                locale: locale.to_string(),
            })
        })
        .collect()
}

/// Voice for `locale`: exact locale first, then any voice of the same
/// language.
pub fn voice_for_locale<'a>(voices: &'a [SayVoice], locale: &str) -> Option<&'a str> {
    let wanted = normalize_locale(locale);
    let language = primary_subtag(&wanted);

    voices
        .iter()
        .find(|v| normalize_locale(&v.locale) == wanted)
        .or_else(|| {
            voices
                .iter()
                .find(|v| primary_subtag(&normalize_locale(&v.locale)) == language)
        })
        .map(|v| v.name.as_str())
}

fn normalize_locale(locale: &str) -> String {
    locale.replace('_', "-").to_ascii_lowercase()
}

fn primary_subtag(locale: &str) -> &str {
    locale.split('-').next().unwrap_or(locale)
}

/// Program plus arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SpeechBackend {
    /// Backend for the platform this binary was built for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            SpeechBackend::Say
        } else if cfg!(target_os = "windows") {
            SpeechBackend::PowerShell
        } else {
            SpeechBackend::EspeakNg
        }
    }

    /// Build the command that speaks `text`.
    ///
    /// `voices` is the `say` voice listing; the other backends select the
    /// voice from `locale` themselves and ignore it.
    pub fn command(
        self,
        text: &str,
        locale: &str,
        rate: f32,
        voices: &[SayVoice],
    ) -> SpeechCommand {
        let wpm = (NORMAL_WPM * rate).round() as u32;
        match self {
            SpeechBackend::Say => {
                let mut args = Vec::new();
                match voice_for_locale(voices, locale) {
                    Some(voice) => args.extend(["-v".to_string(), voice.to_string()]),
                    None => log::debug!("speech: no `say` voice for {locale}, using default"),
                }
                args.extend(["-r".into(), wpm.to_string(), "--".into(), text.into()]);
                SpeechCommand {
                    program: "say".into(),
                    args,
                }
            }
            SpeechBackend::EspeakNg => {
                let voice = locale
                    .split('-')
                    .next()
                    .unwrap_or(locale)
                    .to_ascii_lowercase();
                SpeechCommand {
                    program: "espeak-ng".into(),
                    args: vec![
                        "-v".into(),
                        voice,
                        "-s".into(),
                        wpm.to_string(),
                        "--".into(),
                        text.into(),
                    ],
                }
            }
            SpeechBackend::PowerShell => {
                let sapi_rate = ((rate - 1.0) * 10.0).round().clamp(-10.0, 10.0) as i32;
                let script = format!(
                    "Add-Type -AssemblyName System.Speech; \
                     $s = New-Object System.Speech.Synthesis.SpeechSynthesizer; \
                     $s.Rate = {sapi_rate}; \
                     $v = $s.GetInstalledVoices() | Where-Object {{ $_.VoiceInfo.Culture.Name -eq '{locale}' }} | Select-Object -First 1; \
                     if ($v) {{ $s.SelectVoice($v.VoiceInfo.Name) }}; \
                     $s.Speak('{}')",
                    text.replace('\'', "''")
                );
                SpeechCommand {
                    program: "powershell".into(),
                    args: vec!["-NoProfile".into(), "-Command".into(), script],
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CommandSpeaker
// ---------------------------------------------------------------------------

/// [`Speaker`] that spawns the platform synthesiser.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    backend: SpeechBackend,
    say_voices: OnceLock<Vec<SayVoice>>,
}

impl CommandSpeaker {
    pub fn new(backend: SpeechBackend) -> Self {
        Self {
            backend,
            say_voices: OnceLock::new(),
        }
    }

    /// Speaker with a fixed `say` voice listing instead of querying the system.
    pub fn with_voices(backend: SpeechBackend, voices: Vec<SayVoice>) -> Self {
        Self {
            backend,
            say_voices: OnceLock::from(voices),
        }
    }

    /// The command [`speak`](Speaker::speak) would spawn.
    pub fn command(&self, text: &str, locale: &str, rate: f32) -> SpeechCommand {
        self.backend.command(text, locale, rate, self.voices())
    }

    fn voices(&self) -> &[SayVoice] {
        self.say_voices.get_or_init(|| match self.backend {
            SpeechBackend::Say => query_say_voices(),
            _ => Vec::new(),
        })
    }
}

fn query_say_voices() -> Vec<SayVoice> {
    match Command::new("say").args(["-v", "?"]).stdin(Stdio::null()).output() {
        Ok(output) if output.status.success() => {
            let voices = parse_say_voices(&String::from_utf8_lossy(&output.stdout));
            log::debug!("speech: {} `say` voices installed", voices.len());
            voices
        }
        Ok(output) => {
            log::debug!("speech: `say -v ?` exited with {}", output.status);
            Vec::new()
        }
        Err(e) => {
            log::debug!("speech: could not list `say` voices: {e}");
            Vec::new()
        }
    }
}

impl Default for CommandSpeaker {
    fn default() -> Self {
        Self::new(SpeechBackend::current())
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str, locale: &str, rate: f32) -> Result<(), OutputError> {
        let cmd = self.command(text, locale, rate);

        let mut child = Command::new(&cmd.program)
            .args(&cmd.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| OutputError::SpeechSpawn {
                program: cmd.program.clone(),
                source,
            })?;

        let reaper = std::thread::Builder::new()
            .name("speech-reaper".into())
            .spawn(move || {
                if let Err(e) = child.wait() {
                    log::debug!("speech: waiting on synthesiser failed: {e}");
                }
            });
        if let Err(e) = reaper {
            log::debug!("speech: could not spawn reaper thread: {e}");
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAY_LISTING: &str = "\
Alex                en_US    # Most people recognize me by my voice.
Anna                de_DE    # Hallo, ich heiße Anna.
Eddy (Spanish (Spain)) es_ES    # Hola, me llamo Eddy.
Paulina             es_MX    # Hola, me llamo Paulina.
Bad News            en_US    # The light you see at the end of the tunnel.
not a voice line
";

    fn say_voices() -> Vec<SayVoice> {
        parse_say_voices(SAY_LISTING)
    }

    #[test]
    fn say_listing_parses_names_with_spaces() {
        let voices = say_voices();
        assert_eq!(voices.len(), 5);
        assert_eq!(
            voices[2],
            SayVoice {
                name: "Eddy (Spanish (Spain))".into(),
                locale: "es_ES".into(),
            }
        );
        assert_eq!(voices[4].name, "Bad News");
    }

    #[test]
    fn voice_lookup_prefers_exact_locale_then_language() {
        let voices = say_voices();
        assert_eq!(voice_for_locale(&voices, "es-ES"), Some("Eddy (Spanish (Spain))"));
        assert_eq!(voice_for_locale(&voices, "es-AR"), Some("Eddy (Spanish (Spain))"));
        assert_eq!(voice_for_locale(&voices, "de-DE"), Some("Anna"));
        assert_eq!(voice_for_locale(&voices, "pt-PT"), None);
    }

    #[test]
    fn say_selects_voice_for_target_locale() {
        let speaker = CommandSpeaker::with_voices(SpeechBackend::Say, say_voices());
        let cmd = speaker.command("hola", "es-ES", 0.8);
        assert_eq!(cmd.program, "say");
        assert_eq!(
            cmd.args,
            vec!["-v", "Eddy (Spanish (Spain))", "-r", "140", "--", "hola"]
        );

        let cmd = speaker.command("Hallo", "de-DE", 1.0);
        assert_eq!(cmd.args[..2], ["-v", "Anna"]);
    }

    #[test]
    fn say_without_matching_voice_uses_default_and_guards_dashes() {
        let cmd = SpeechBackend::Say.command("-olá", "pt-PT", 0.8, &say_voices());
        assert_eq!(cmd.args, vec!["-r", "140", "--", "-olá"]);
    }

    #[test]
    fn espeak_uses_primary_language_subtag() {
        let cmd = SpeechBackend::EspeakNg.command("-hallo", "de-DE", 1.0, &[]);
        assert_eq!(cmd.program, "espeak-ng");
        assert_eq!(cmd.args, vec!["-v", "de", "-s", "175", "--", "-hallo"]);
    }

    #[test]
    fn powershell_escapes_quotes_and_maps_rate() {
        let cmd = SpeechBackend::PowerShell.command("l'amico", "it-IT", SPEECH_RATE, &[]);
        assert_eq!(cmd.program, "powershell");
        let script = cmd.args.last().unwrap();
        assert!(script.contains("$s.Rate = -1;"));
        assert!(script.contains("'it-IT'"));
        assert!(script.contains("$s.Speak('l''amico')"));
    }

    #[test]
    fn default_speaker_targets_current_platform() {
        assert_eq!(CommandSpeaker::default().backend, SpeechBackend::current());
    }

    #[test]
    fn speaker_is_object_safe() {
        let speaker: Box<dyn Speaker> = Box::new(CommandSpeaker::new(SpeechBackend::EspeakNg));
        drop(speaker);
    }
}
