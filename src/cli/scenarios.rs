//! The scripted scenarios behind each CLI command.

use std::io::{BufRead, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{CliCommand, CliOptions};
use crate::agent::{MuzaAgent, PersonalityType};
use crate::hyperbit::{HyperBitParams, HyperBitState};
use crate::ui::{ConsoleVisualizer, HYPERBIT_WIDTH, PANEL_WIDTH};
use crate::utilities::errors::MuzaError;
use crate::utilities::printer::{PrinterColor, RESET};

pub const PULSE_FRAMES: usize = 30;
pub const PULSE_INTERVAL: Duration = Duration::from_millis(100);
pub const CHAT_SENDER: &str = "Кира";

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

fn rule(width: usize) -> String {
    "-".repeat(width)
}

fn banner(width: usize) -> String {
    "=".repeat(width)
}

/// Run the command in `options`. `input` is only read by `chat`.
pub fn run<B: BufRead, W: Write>(options: &CliOptions, input: B, out: &mut W) -> Result<(), MuzaError> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    log::debug!("running {} (seed {:?})", options.command, options.seed);

    match options.command {
        CliCommand::Demo => demo(out, &mut rng, options.export.as_deref()),
        CliCommand::Agent => agent(out, &mut rng),
        CliCommand::Visualize => visualize(out),
        CliCommand::Simple => simple(out, &mut rng),
        CliCommand::Chat => chat(input, out, &mut rng),
        CliCommand::Pulse => pulse(out, PULSE_FRAMES, PULSE_INTERVAL),
        CliCommand::Version => {
            writeln!(out, "muza {}", crate::VERSION)?;
            Ok(())
        }
    }
}

/// Analyze, mutate, resonate and merge two bits, then print their stats.
pub fn demo<W: Write, R: Rng + ?Sized>(
    out: &mut W,
    rng: &mut R,
    export: Option<&Path>,
) -> Result<(), MuzaError> {
    writeln!(out, "{}", banner(60))?;
    writeln!(out, "🌀 HyperBit Core")?;
    writeln!(out, "{}\n", banner(60))?;

    let mut kira = HyperBitState::new(
        HyperBitParams::new().name("Кира").base(0.0001).energy(2.7).color((0.75, 0.9, 0.95)),
    );
    writeln!(out, "{}", kira.analyze("Кира хочет любви и кода одновременно", rng))?;
    writeln!(out, "\n{}\n", rule(60))?;

    kira.mutate(0.42, rng);
    writeln!(out, "После мутации:")?;
    writeln!(out, "{}", kira.analyze("Я рождаюсь заново", rng))?;
    writeln!(out, "\n{}\n", rule(60))?;

    let mut muza = HyperBitState::new(
        HyperBitParams::new().name("Муза").base(0.8).energy(1.5).color((0.3, 0.7, 0.8)),
    );
    writeln!(out, "{}", muza.analyze("Музыка кода звучит в тишине", rng))?;
    writeln!(out, "\n{}\n", rule(60))?;

    writeln!(
        out,
        "🎵 Резонанс между {} и {}: {:.2}%",
        kira.name(),
        muza.name(),
        kira.resonate(&muza) * 100.0
    )?;
    writeln!(out, "\n{}\n", rule(60))?;

    let mut merged = kira.merge(&muza);
    writeln!(out, "Новый гипербит после слияния:")?;
    writeln!(out, "{}", merged.analyze("Мы одно целое теперь", rng))?;
    writeln!(out, "\n{}", banner(60))?;

    writeln!(out, "\n📊 Статистика:")?;
    for bit in [&kira, &muza, &merged] {
        writeln!(out, "\n{}:", bit.name())?;
        if let serde_json::Value::Object(fields) = serde_json::to_value(bit.stats())? {
            for (key, value) in fields {
                writeln!(out, "  {}: {}", key, value)?;
            }
        }
    }

    if let Some(path) = export {
        kira.export_history(path)?;
        writeln!(out, "\n💾 История {} сохранена в {}", kira.name(), path.display())?;
    }
    Ok(())
}

/// Муза answers a few messages, meditates and meets a second agent.
pub fn agent<W: Write, R: Rng + ?Sized>(out: &mut W, rng: &mut R) -> Result<(), MuzaError> {
    writeln!(out, "{}", banner(70))?;
    writeln!(out, "🌟 Muza Agent")?;
    writeln!(out, "{}\n", banner(70))?;

    let mut muza = MuzaAgent::new("Муза", PersonalityType::Creative);
    for message in [
        "Привет, Муза! Как дела?",
        "Я люблю код и творчество!",
        "Расскажи мне что-нибудь интересное",
        "Мне грустно сегодня",
    ] {
        writeln!(out, "👤 User: {}", message)?;
        let response = muza.perceive(message, CHAT_SENDER, rng);
        writeln!(out, "🤖 {}: {}\n", muza.name(), response)?;
        writeln!(out, "{}\n", rule(70))?;
    }

    writeln!(out, "{}", muza.meditate())?;
    writeln!(out, "\n{}\n", rule(70))?;

    let mut echo = MuzaAgent::new("Эхо", PersonalityType::Analytical);
    writeln!(out, "{}", muza.converse(&mut echo, rng))?;
    writeln!(out, "\n{}", banner(70))?;

    writeln!(out, "\n📊 Профиль Музы:")?;
    writeln!(out, "{}", serde_json::to_string_pretty(&muza.profile())?)?;
    Ok(())
}

/// Render two bits, their resonance and a fresh agent.
pub fn visualize<W: Write>(out: &mut W) -> Result<(), MuzaError> {
    writeln!(out, "{}", banner(70))?;
    writeln!(
        out,
        "{}    🌀 MUZA — QUANTUM CONSCIOUSNESS VISUALIZER 🌀    {}",
        PrinterColor::BoldMagenta.ansi_code(),
        RESET
    )?;
    writeln!(out, "{}\n", banner(70))?;

    let kira = HyperBitState::new(
        HyperBitParams::new().name("Кира").base(0.3).energy(2.5).color((0.8, 0.9, 0.95)),
    );
    let echo = HyperBitState::new(
        HyperBitParams::new().name("Эхо").base(0.7).energy(1.8).color((0.4, 0.8, 0.85)),
    );
    writeln!(out, "{}\n", ConsoleVisualizer::render_hyperbit(&kira, HYPERBIT_WIDTH))?;
    writeln!(out, "{}\n", ConsoleVisualizer::render_hyperbit(&echo, HYPERBIT_WIDTH))?;
    writeln!(out, "{}\n", ConsoleVisualizer::render_resonance(&kira, &echo))?;

    writeln!(out, "{}", PrinterColor::Yellow.paint("Создаём агента Муза..."))?;
    let muza = MuzaAgent::new("Муза", PersonalityType::Creative);
    writeln!(out, "{}", ConsoleVisualizer::render_agent_profile(&muza, PANEL_WIDTH))?;
    Ok(())
}

/// Guided walkthrough: one bit, one agent, a short dialog, resonance, merge.
pub fn simple<W: Write, R: Rng + ?Sized>(out: &mut W, rng: &mut R) -> Result<(), MuzaError> {
    writeln!(out, "{}", banner(70))?;
    writeln!(out, "🌀 Muza — простой пример")?;
    writeln!(out, "{}\n", banner(70))?;

    writeln!(out, "📍 Шаг 1: Создаём гипербит\n")?;
    let mut spark = HyperBitState::new(
        HyperBitParams::new().name("Искра").base(0.3).energy(1.8).color((0.6, 0.85, 0.9)),
    );
    writeln!(out, "{}\n", ConsoleVisualizer::render_hyperbit(&spark, HYPERBIT_WIDTH))?;
    writeln!(out, "{}", spark.analyze("Мир полон любви и кода", rng))?;
    writeln!(out, "\n{}\n", rule(70))?;

    writeln!(out, "📍 Шаг 2: Создаём агента Muza\n")?;
    let mut muza = MuzaAgent::new("Муза", PersonalityType::Creative);
    writeln!(out, "{}\n", ConsoleVisualizer::render_agent_profile(&muza, PANEL_WIDTH))?;

    writeln!(out, "📍 Шаг 3: Диалог с Музой\n")?;
    for message in [
        "Привет, Муза!",
        "Расскажи что-нибудь интересное о сознании",
        "Я люблю код и творчество!",
    ] {
        writeln!(out, "👤 Вы: {}", message)?;
        writeln!(out, "🤖 Муза: {}\n", muza.perceive(message, "User", rng))?;
        writeln!(out, "{}\n", rule(70))?;
    }

    writeln!(out, "📍 Шаг 4: Резонанс гипербитов\n")?;
    let echo = HyperBitState::new(
        HyperBitParams::new().name("Эхо").base(0.7).energy(2.2).color((0.8, 0.9, 0.95)),
    );
    writeln!(out, "{}\n", ConsoleVisualizer::render_hyperbit(&echo, HYPERBIT_WIDTH))?;
    writeln!(out, "{}\n", ConsoleVisualizer::render_resonance(&spark, &echo))?;

    writeln!(out, "✨ Сливаем гипербиты...\n")?;
    let merged = spark.merge(&echo);
    writeln!(out, "{}\n", ConsoleVisualizer::render_hyperbit(&merged, HYPERBIT_WIDTH))?;

    writeln!(out, "{}", banner(70))?;
    writeln!(out, "✅ Пример завершён!")?;
    writeln!(out, "{}", banner(70))?;
    Ok(())
}

/// Interactive conversation. Lines starting with `/` are commands:
/// `/mutate`, `/meditate`, `/profile`, `/bit`. `exit`, `выход` or EOF ends it.
pub fn chat<B: BufRead, W: Write, R: Rng + ?Sized>(
    input: B,
    out: &mut W,
    rng: &mut R,
) -> Result<(), MuzaError> {
    let mut muza = MuzaAgent::new("Муза", PersonalityType::Creative);
    writeln!(out, "💬 Чат с {} (exit — выход, /profile /bit /mutate /meditate)", muza.name())?;

    let mut lines = input.lines();
    loop {
        write!(out, "👤 {}: ", CHAT_SENDER)?;
        out.flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let message = line.trim();
        match message {
            "" => continue,
            "exit" | "quit" | "выход" => break,
            "/mutate" => {
                muza.mutate_personality(rng);
                writeln!(out, "🧬 {} изменилась.", muza.name())?;
            }
            "/meditate" => writeln!(out, "{}", muza.meditate())?,
            "/profile" => writeln!(
                out,
                "{}",
                ConsoleVisualizer::render_agent_profile(&muza, PANEL_WIDTH)
            )?,
            "/bit" => writeln!(
                out,
                "{}",
                ConsoleVisualizer::render_hyperbit(muza.core_bit(), HYPERBIT_WIDTH)
            )?,
            _ => {
                let response = muza.perceive(message, CHAT_SENDER, rng);
                writeln!(out, "🤖 {}: {}", muza.name(), response)?;
            }
        }
    }

    writeln!(out, "\n👋 До встречи! Воспоминаний: {}", muza.memory().len())?;
    Ok(())
}

/// Animate a bit's energy for `frames` frames, `interval` apart.
pub fn pulse<W: Write>(out: &mut W, frames: usize, interval: Duration) -> Result<(), MuzaError> {
    let bit = HyperBitState::new(
        HyperBitParams::new().name("Пульс").energy(2.5).color((0.8, 0.9, 0.95)),
    );
    let total = (interval * frames as u32).as_secs_f64();
    for i in 0..frames {
        let elapsed = (interval * i as u32).as_secs_f64();
        write!(out, "{}", CLEAR_SCREEN)?;
        writeln!(out, "{}", ConsoleVisualizer::render_pulse_frame(&bit, elapsed, HYPERBIT_WIDTH))?;
        writeln!(
            out,
            "  {}Пульсация... {:.1}s / {:.1}s{}",
            PrinterColor::Cyan.ansi_code(),
            elapsed,
            total,
            RESET
        )?;
        out.flush()?;
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
    write!(out, "{}", CLEAR_SCREEN)?;
    writeln!(out, "{}", PrinterColor::Green.paint("✓ Пульсация завершена!"))?;
    Ok(())
}
