#![deny(warnings)]

mod languages;

use anyhow::Context;
use clap::Parser;
use fallback_translator_core::config::{
    resolve_millis_with_default, resolve_string_with_default, Endpoints, Env, StdEnv,
    TimeoutBudget, TranslatorConfig, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_GOOGLE_BASE_URL,
    DEFAULT_MYMEMORY_BASE_URL, DEFAULT_OVERALL_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS,
    DEFAULT_USER_AGENT, ENV_GOOGLE_BASE_URL, ENV_MYMEMORY_BASE_URL, ENV_OVERALL_TIMEOUT_MS,
};
use fallback_translator_core::translate::{
    is_valid_translation, FallbackTranslator, TranslationRequest, TranslationResult,
};
use languages::{Language, DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG, LANGUAGES};
use std::io::{Read, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_OK: u8 = 0;
const EXIT_SUSPICIOUS: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "fallback-translator")]
#[command(about = "Translate text via free online providers, falling back to a mock translation")]
struct Args {
    /// Text to translate. Read from stdin when omitted.
    text: Option<String>,

    /// Source language name or code.
    #[arg(long, default_value = DEFAULT_SOURCE_LANG)]
    from: String,

    /// Target language name or code.
    #[arg(long, default_value = DEFAULT_TARGET_LANG)]
    to: String,

    /// Swap source and target before translating.
    #[arg(long)]
    swap: bool,

    /// Ceiling for the whole provider chain.
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_MS)]
    connect_timeout_ms: u64,

    #[arg(long, default_value_t = DEFAULT_READ_TIMEOUT_MS)]
    read_timeout_ms: u64,

    #[arg(long)]
    mymemory_url: Option<String>,

    #[arg(long)]
    google_url: Option<String>,

    /// Print the full result as JSON.
    #[arg(long)]
    json: bool,

    /// Exit with status 2 if the result looks like an echo or an error message.
    #[arg(long)]
    validate: bool,

    #[arg(long)]
    list_languages: bool,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    if args.list_languages {
        for (name, code) in LANGUAGES {
            println!("{code}\t{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cfg = build_config(&args, &StdEnv)?;
    let (source, target) = resolve_languages(&args.from, &args.to, args.swap)?;
    let text = read_text(args.text.clone())?;

    tracing::debug!(
        source = %source.code,
        target = %target.code,
        overall_ms = cfg.timeouts.overall_ms,
        "config loaded"
    );

    let translator =
        FallbackTranslator::from_config(&cfg).context("failed to initialise http client")?;
    let request = TranslationRequest::new(text.clone(), source.code, target.code.clone());
    let result = translator
        .spawn(request)
        .await
        .context("translation task failed")?;

    let code = render(&args, &text, &target, &result, &mut std::io::stdout().lock())?;
    Ok(ExitCode::from(code))
}

/// Writes the result to `out` and the status line to stderr. Returns the
/// process exit code.
fn render(
    args: &Args,
    text: &str,
    target: &Language,
    result: &TranslationResult,
    out: &mut impl Write,
) -> anyhow::Result<u8> {
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
    } else {
        writeln!(out, "{}", result.translated_text)?;
    }
    eprintln!("{}", status_line(result));

    if args.validate && !is_valid_translation(text, &result.translated_text, &target.label) {
        eprintln!("translation to {} failed validation", target.label);
        return Ok(EXIT_SUSPICIOUS);
    }

    Ok(EXIT_OK)
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: &Args, env: &impl Env) -> anyhow::Result<TranslatorConfig> {
    let overall_ms = resolve_millis_with_default(
        args.timeout_ms,
        ENV_OVERALL_TIMEOUT_MS,
        env,
        DEFAULT_OVERALL_TIMEOUT_MS,
    )?;
    let timeouts = TimeoutBudget::new(args.connect_timeout_ms, args.read_timeout_ms, overall_ms)?;

    let mymemory = resolve_string_with_default(
        args.mymemory_url.clone(),
        ENV_MYMEMORY_BASE_URL,
        env,
        DEFAULT_MYMEMORY_BASE_URL,
    );
    let google = resolve_string_with_default(
        args.google_url.clone(),
        ENV_GOOGLE_BASE_URL,
        env,
        DEFAULT_GOOGLE_BASE_URL,
    );
    let endpoints = Endpoints::new(&mymemory, &google)?;

    Ok(TranslatorConfig {
        timeouts,
        endpoints,
        user_agent: DEFAULT_USER_AGENT.to_owned(),
    })
}

fn resolve_languages(from: &str, to: &str, swap: bool) -> anyhow::Result<(Language, Language)> {
    let (mut source, mut target) = (languages::resolve(from), languages::resolve(to));
    if swap {
        std::mem::swap(&mut source, &mut target);
    }
    if source.code.is_empty() || target.code.is_empty() {
        anyhow::bail!("Please select both languages");
    }
    if source.code == target.code {
        anyhow::bail!("Source and target languages must be different");
    }
    Ok((source, target))
}

fn read_text(arg: Option<String>) -> anyhow::Result<String> {
    let raw = match arg {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read text from stdin")?;
            buf
        }
    };
    let text = raw.trim();
    if text.is_empty() {
        anyhow::bail!("Please enter text to translate");
    }
    Ok(text.to_owned())
}

fn status_line(result: &TranslationResult) -> String {
    if result.is_real {
        format!("Translation completed via {}", result.source)
    } else {
        format!("Mock translation (APIs unavailable) - {}", result.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fallback_translator_core::config::MapEnv;
    use std::time::SystemTime;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["fallback-translator", "hello"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn env_overrides_defaults_and_flags_override_env() {
        let env = MapEnv::default()
            .with_var(ENV_OVERALL_TIMEOUT_MS, "2500")
            .with_var(ENV_GOOGLE_BASE_URL, "http://127.0.0.1:9000");

        let cfg = build_config(&args(&[]), &env).expect("valid config");
        assert_eq!(cfg.timeouts.overall_ms, 2500);
        assert_eq!(cfg.endpoints.google, "http://127.0.0.1:9000");
        assert_eq!(cfg.endpoints.mymemory, DEFAULT_MYMEMORY_BASE_URL);

        let cfg = build_config(&args(&["--timeout-ms", "400"]), &env).expect("valid config");
        assert_eq!(cfg.timeouts.overall_ms, 400);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(build_config(&args(&["--timeout-ms", "0"]), &MapEnv::default()).is_err());
    }

    #[test]
    fn same_languages_rejected_and_swap_applies() {
        assert!(resolve_languages("English", "en", false).is_err());

        let (source, target) = resolve_languages("English", "German", true).expect("distinct");
        assert_eq!(source.code, "de");
        assert_eq!(target.code, "en");
    }

    #[test]
    fn blank_text_rejected() {
        assert!(read_text(Some("   ".to_owned())).is_err());
        assert_eq!(read_text(Some("  hi \n".to_owned())).unwrap(), "hi");
    }

    fn real_result(text: &str) -> TranslationResult {
        TranslationResult {
            translated_text: text.into(),
            source: "MyMemory API".into(),
            is_real: true,
            timestamp: SystemTime::now(),
        }
    }

    fn spanish() -> Language {
        languages::resolve("Spanish")
    }

    #[test]
    fn validate_flags_mock_echo() {
        let echo = TranslationResult {
            is_real: false,
            source: "Mock Translation".into(),
            ..real_result("hello")
        };
        let mut out = Vec::new();

        let code = render(&args(&["--validate"]), "hello", &spanish(), &echo, &mut out).unwrap();

        assert_eq!(code, EXIT_SUSPICIOUS);
        assert_eq!(String::from_utf8(out).unwrap(), "hello\n");
    }

    #[test]
    fn validate_passes_real_translation() {
        let mut out = Vec::new();
        let code = render(
            &args(&["--validate"]),
            "hello",
            &spanish(),
            &real_result("hola"),
            &mut out,
        )
        .unwrap();

        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn json_output_carries_whole_result() {
        let mut out = Vec::new();
        let code = render(&args(&["--json"]), "hello", &spanish(), &real_result("hola"), &mut out)
            .unwrap();
        assert_eq!(code, EXIT_OK);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["translated_text"], "hola");
        assert_eq!(value["source"], "MyMemory API");
        assert_eq!(value["is_real"], true);
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn status_line_reflects_provenance() {
        let real = real_result("hola");
        assert_eq!(status_line(&real), "Translation completed via MyMemory API");

        let mock = TranslationResult {
            is_real: false,
            source: "Mock Translation (Timeout)".into(),
            ..real
        };
        assert_eq!(
            status_line(&mock),
            "Mock translation (APIs unavailable) - Mock Translation (Timeout)"
        );
    }
}
