// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words keyview ESCDELAY

//! Puts the terminal in raw mode and prints what every key press decodes to, until
//! `C-q`. Handy to check what a terminal (or tmux, or ssh) actually sends:
//!
//! ```text
//! $ cargo run --bin keyview -- --protocols meta,xterm-mok2,mouse --escape-delay 100
//! ```

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Print decoded terminal keys until C-q")]
struct Cli {
    /// Milliseconds to wait for the rest of an escape sequence. Overrides `ESCDELAY`.
    #[arg(long = "escape-delay", short = 'e')]
    escape_delay_ms: Option<u32>,
    /// Comma separated protocols, eg: `meta,xterm-mok2,kitty,mouse,focus,paste`.
    #[arg(
        long = "protocols",
        short = 'p',
        default_value = "meta",
        value_parser = r3bl_term_input::ProtocolFlags::parse_list
    )]
    protocols: r3bl_term_input::ProtocolFlags,
    /// Report idle periods of this many milliseconds.
    #[arg(long = "idle")]
    idle_ms: Option<u64>,
    /// Print undecoded bytes instead of keys.
    #[arg(long = "raw-bytes", short = 'r')]
    raw_bytes: bool,
    #[arg(long = "enable-logging", short = 'l', help = "Log to term_input.log")]
    enable_logging: bool,
}

#[cfg(unix)]
fn main() -> miette::Result<()> { keyview::run(Cli::parse()) }

#[cfg(not(unix))]
fn main() -> miette::Result<()> {
    let _unused = Cli::parse();
    Err(miette::miette!("keyview needs a unix tty"))
}

#[cfg(unix)]
mod keyview {
    use std::io::Write as _;

    use miette::IntoDiagnostic as _;
    use r3bl_term_input::{CallerTimeout, DEFAULT_LOG_FILE_NAME, EngineConfig, EngineHooks,
                          EscapeDelay, InputEngine, InputEvent, KeyCode, KeyModifiers,
                          MioRawSource, PushbackQueue, RawModeGuard, SystemClock,
                          TracingConfig};
    use tracing_core::LevelFilter;

    use super::Cli;

    const QUIT: KeyCode = KeyCode::char('Q').with_modifiers(KeyModifiers::CTRL);

    /// Raw mode turns off output post processing, so every line ends in `\r\n`.
    macro_rules! raw_println {
        ($($arg:tt)*) => {{
            let mut stdout = std::io::stdout().lock();
            let _unused = write!(stdout, $($arg)*);
            let _unused = write!(stdout, "\r\n");
            let _unused = stdout.flush();
        }};
    }

    #[derive(Debug)]
    struct PrintingHooks;

    impl EngineHooks for PrintingHooks {
        fn on_idle(&mut self, _pushback: &mut PushbackQueue) { raw_println!("-- idle --"); }

        fn on_minute(&mut self, _pushback: &mut PushbackQueue) {
            raw_println!("-- {} --", chrono::Local::now().format("%H:%M"));
        }
    }

    pub fn run(cli: Cli) -> miette::Result<()> {
        if cli.enable_logging {
            TracingConfig::new_file(DEFAULT_LOG_FILE_NAME, LevelFilter::DEBUG).install_global()?;
        }

        let escape_delay = match cli.escape_delay_ms {
            Some(ms) => EscapeDelay::from_command_line(ms)?,
            None => EscapeDelay::default(),
        };
        let config = EngineConfig {
            protocols: cli.protocols,
            escape_delay,
            idle_interval_ms: cli.idle_ms,
            ..Default::default()
        };
        tracing::debug!(message = "keyview starting", config = ?config);

        let _raw_mode = RawModeGuard::enable(config.protocols)?;
        let mut engine = InputEngine::new(MioRawSource::new()?, SystemClock::new(), config)
            .with_hooks(PrintingHooks);
        engine.set_raw_byte_mode(cli.raw_bytes);

        let (delay, source) = engine.escape_delay();
        raw_println!(
            "protocols: {}, escape delay: {delay}ms ({source}). Press C-q to quit.",
            engine.protocols().to_list()
        );

        loop {
            match engine.next_event(CallerTimeout::Forever) {
                InputEvent::KeyDown(QUIT) | InputEvent::RawByte(0x11) => break,
                InputEvent::KeyDown(code) => raw_println!("{code} {code:?}"),
                InputEvent::Mouse(mouse) => raw_println!(
                    "{} at {},{} window {} {:?}",
                    mouse.code,
                    mouse.col,
                    mouse.row,
                    mouse.window.0,
                    mouse.location
                ),
                InputEvent::RawByte(byte) => raw_println!("{byte:#04x}"),
                InputEvent::Timeout if engine.is_disconnected() => break,
                InputEvent::Timeout => {}
            }
        }

        std::io::stdout().flush().into_diagnostic()
    }
}
