//! Terminal player
//!
//! Reads one command per line from stdin while the session's timers run
//! against wall time. The session only knows virtual time, so every wake-up
//! (a line of input or the next timer's due time) first moves it forward to
//! the milliseconds elapsed since the game started.

use crate::{
    cli::view_state::{ViewState, clear_screen, paint, render_text},
    config::EngineConfig,
    error::EngineError,
    presentation::{AssetTable, DashboardView, SceneKey, state_label},
    session::{PlayerSession, SessionEffect},
    types::{context::Direction, event::Event, segment::ColorToken, state::NarrativeState},
};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

/// A parsed line of player input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Help,
    /// Show the whole current text
    Skip,
    Restart,
    Choose(usize),
    Press(Vec<Direction>),
    Drive,
    SetDistance(i64),
    Back,
    Email(String),
    Unknown(String),
}

/// Interpret `input` for the current state
pub fn parse_command(state: NarrativeState, input: &str) -> Command {
    let input = input.trim();
    match input {
        "q" | "quit" => return Command::Quit,
        "h" | "help" | "?" => return Command::Help,
        "restart" => return Command::Restart,
        "" => return Command::Skip,
        _ => {}
    }

    match state {
        NarrativeState::QteSequence => input
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Direction>, _>>()
            .map(Command::Press)
            .unwrap_or_else(|_| Command::Unknown(input.to_string())),
        NarrativeState::Driving => match input {
            "+" => Command::Drive,
            _ => input
                .parse()
                .map(Command::SetDistance)
                .unwrap_or_else(|_| Command::Unknown(input.to_string())),
        },
        NarrativeState::PaymentInput => match input {
            "b" | "back" => Command::Back,
            _ => Command::Email(input.to_string()),
        },
        _ => input
            .parse()
            .map(Command::Choose)
            .unwrap_or_else(|_| Command::Unknown(input.to_string())),
    }
}

/// Terminal stand-ins for the scene pictures
fn scene_glyphs() -> AssetTable<&'static str> {
    AssetTable::new("[?]")
        .with(SceneKey::ParkingLot, "🅿️  停車場")
        .with(SceneKey::CarInterior, "🚗 車內")
        .with(SceneKey::BlueScreen, "💀 [BSOD]")
        .with(SceneKey::OiiaCat, "🐱 [CAT]")
        .with(SceneKey::OiiaCatSpin, "🌀 [OIIA]")
        .with(SceneKey::StreetCat, "🐱 [CAT]")
        .with(SceneKey::Protagonist, "🧑 主角")
        .with(SceneKey::MovingCar, "🚙 行駛中")
        .with(SceneKey::Spaghetti, "🍝 義大利麵")
        .with(SceneKey::SpaghettiEaten, "🍽️  空盤")
        .with(SceneKey::SpaghettiDance, "💃 [DANCE]")
        .with(SceneKey::HandTouching, "✋ 邊界")
        .with(SceneKey::MysteriousMan, "🕶️  神秘人")
        .with(SceneKey::RailingClosed, "🚧 [GATE]")
        .with(SceneKey::RailingOpening, "🚦 [GATE OPEN]")
        .with(SceneKey::StaticNoise, "📺 [NOISE]")
}

/// Run the player until the player quits or stdin closes
pub async fn run_play(config: &EngineConfig, debug: bool) -> anyhow::Result<()> {
    let mut session = PlayerSession::new(config);
    let mut view = ViewState::new();
    let glyphs = scene_glyphs();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let origin = Instant::now();

    clear_screen();
    println!("=== OIIA 停車場 ===");
    print_help();

    let effects = session.take_effects();
    render(&session, &mut view, &glyphs, &effects, debug)?;

    loop {
        let wake = session
            .next_due()
            .map(|due| origin + Duration::from_millis(due));

        tokio::select! {
            line = lines.next_line() => {
                session.advance_to(elapsed_ms(origin));
                let Some(line) = line? else {
                    break;
                };
                match parse_command(session.state(), &line) {
                    Command::Quit => break,
                    command => {
                        if let Err(err) = execute(&mut session, command) {
                            println!("{}", paint(&format!("⚠️  {err}"), ColorToken::Mysterious));
                        }
                    }
                }
            }
            _ = wait_until(wake) => {
                session.advance_to(elapsed_ms(origin));
            }
        }

        let effects = session.take_effects();
        render(&session, &mut view, &glyphs, &effects, debug)?;
    }

    println!();
    println!("下次見！");
    Ok(())
}

fn execute(session: &mut PlayerSession, command: Command) -> Result<(), EngineError> {
    match command {
        Command::Quit => {}
        Command::Help => print_help(),
        Command::Skip => session.skip_typing(),
        Command::Restart => {
            session.restart();
        }
        Command::Choose(index) => {
            session.choose(index)?;
        }
        Command::Press(keys) => {
            for key in keys {
                session.press(key);
            }
            show_qte(session);
        }
        Command::Drive => {
            session.drive();
        }
        Command::SetDistance(distance) => {
            session.set_distance(distance);
        }
        Command::Back => {
            session.send(Event::Back);
        }
        Command::Email(email) => {
            session.submit_email(&email)?;
        }
        Command::Unknown(input) => {
            println!("無法理解的指令：{input}（輸入 h 查看說明）");
        }
    }
    Ok(())
}

fn render(
    session: &PlayerSession,
    view: &mut ViewState,
    glyphs: &AssetTable<&'static str>,
    effects: &[SessionEffect],
    debug: bool,
) -> std::io::Result<()> {
    let delta = view.apply(session, effects);
    if delta.is_empty() {
        return Ok(());
    }

    if let Some(state) = delta.state_changed {
        println!();
        println!("──── {} ────", state_label(state));
        if debug {
            show_dashboard(&session.dashboard());
        }
    }
    if delta.scene_changed.is_some() {
        let snapshot = session.snapshot();
        println!("[{}]", glyphs.scene(snapshot.state, &snapshot.context));
    }

    render_text(&delta);
    for notice in &delta.notices {
        println!("{notice}");
    }
    if delta.text_completed {
        show_prompt(session);
    }
    std::io::stdout().flush()
}

fn show_prompt(session: &PlayerSession) {
    println!();
    match session.state() {
        NarrativeState::QteSequence => show_qte(session),
        NarrativeState::Driving => {
            let dashboard = session.dashboard();
            println!(
                "距離 {} ({:.0}%) {}  輸入 + 前進，或輸入數字設定距離",
                dashboard.distance,
                dashboard.percent.max(0.0),
                dashboard.status.label()
            );
        }
        NarrativeState::PaymentInput => println!("📧 輸入您的電子信箱以接收帳單（b 返回）"),
        NarrativeState::AtGate | NarrativeState::GateOpening => println!("……"),
        _ => {
            for (i, choice) in session.choices().iter().enumerate() {
                println!("  {}. {}", i + 1, choice.label);
            }
        }
    }
}

fn show_qte(session: &PlayerSession) {
    let snapshot = session.snapshot();
    let ctx = &snapshot.context;
    let sequence: String = ctx
        .qte_sequence
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let symbol = d.symbol().to_string();
            if i < ctx.qte_progress {
                paint(&symbol, ColorToken::System)
            } else {
                symbol
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!("QTE: {sequence}  （u/d/l/r 或 up/down/left/right）");
}

fn show_dashboard(dashboard: &DashboardView) {
    println!(
        "[debug] {} | {} | 距離 {}",
        dashboard.state_label,
        dashboard.status.label(),
        dashboard.distance
    );
    for line in dashboard.logs.iter().take(3) {
        println!("[debug]   {line}");
    }
}

fn print_help() {
    println!();
    println!("操作說明:");
    println!("  Enter     顯示全部文字");
    println!("  1-9       選擇選項");
    println!("  u d l r   QTE 方向鍵（可一次輸入多個）");
    println!("  +         駕駛前進一步");
    println!("  restart   重新開始");
    println!("  q         離開");
}

fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
