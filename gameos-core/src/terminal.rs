//! Line-oriented terminal over a [`GameSession`].
//!
//! Every non-empty line earns the per-command bonus before it runs, even
//! when the command is unknown or fails.

use crate::fs::NodeKind;
use crate::process::Pid;
use crate::session::{GameSession, Outcome};
use crate::system::format_uptime;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const BAR_WIDTH: usize = 20;

/// A parsed terminal command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Ls(Option<String>),
    Cd(Option<String>),
    Pwd,
    Mkdir(Option<String>),
    Touch(Option<String>),
    Cat(Option<String>),
    Rm(Option<String>),
    Ps,
    Kill(Option<String>),
    Top,
    Stats,
    Achievements,
    Missions,
    Level,
    Unknown(String),
}

impl Command {
    /// Parse one line. Blank lines are `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let name = parts.next()?;
        let arg = parts.next().map(str::to_string);

        Some(match name {
            "help" => Command::Help,
            "ls" => Command::Ls(arg),
            "cd" => Command::Cd(arg),
            "pwd" => Command::Pwd,
            "mkdir" => Command::Mkdir(arg),
            "touch" => Command::Touch(arg),
            "cat" => Command::Cat(arg),
            "rm" => Command::Rm(arg),
            "ps" => Command::Ps,
            "kill" => Command::Kill(arg),
            "top" => Command::Top,
            "stats" => Command::Stats,
            "achievements" => Command::Achievements,
            "missions" => Command::Missions,
            "level" => Command::Level,
            other => Command::Unknown(other.to_string()),
        })
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Help => "help",
            Command::Ls(_) => "ls",
            Command::Cd(_) => "cd",
            Command::Pwd => "pwd",
            Command::Mkdir(_) => "mkdir",
            Command::Touch(_) => "touch",
            Command::Cat(_) => "cat",
            Command::Rm(_) => "rm",
            Command::Ps => "ps",
            Command::Kill(_) => "kill",
            Command::Top => "top",
            Command::Stats => "stats",
            Command::Achievements => "achievements",
            Command::Missions => "missions",
            Command::Level => "level",
            Command::Unknown(name) => name.as_str(),
        }
    }
}

/// Result of running one terminal line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandOutput {
    pub command: String,
    pub output: String,
    pub success: bool,
    pub outcome: Outcome,
}

/// Run `line` against the session.
pub fn execute(session: &mut GameSession, line: &str) -> CommandOutput {
    let line = line.trim();
    let Some(command) = Command::parse(line) else {
        return CommandOutput {
            success: true,
            ..CommandOutput::default()
        };
    };

    let mut outcome = session.record_command(command.name());
    let result = run(session, &command, &mut outcome);
    let (output, success) = match result {
        Ok(output) => (output, true),
        Err(output) => (output, false),
    };

    CommandOutput {
        command: line.to_string(),
        output,
        success,
        outcome,
    }
}

fn missing(name: &str) -> String {
    format!("❌ {name}: missing argument")
}

fn run(
    session: &mut GameSession,
    command: &Command,
    outcome: &mut Outcome,
) -> Result<String, String> {
    match command {
        Command::Help => Ok(HELP.to_string()),

        Command::Ls(path) => {
            let entries = match path {
                Some(path) => session.list(path),
                None => session.list_cwd(),
            }
            .map_err(|e| format!("❌ ls: {e}"))?;
            let mut out = String::new();
            for entry in entries {
                let icon = if entry.kind == NodeKind::Directory {
                    "📁"
                } else {
                    "📄"
                };
                let _ = writeln!(out, "{icon} {}", entry.name);
            }
            Ok(out.trim_end().to_string())
        }

        Command::Cd(path) => {
            let path = path.as_deref().ok_or_else(|| missing("cd"))?;
            let change = session
                .change_directory(path)
                .map_err(|_| format!("❌ cd: {path}: No such directory"))?;
            outcome.merge(change);
            Ok(format!("📁 Changed to: {}", session.cwd()))
        }

        Command::Pwd => Ok(format!("📍 {}", session.cwd())),

        Command::Mkdir(path) => {
            let path = path.as_deref().ok_or_else(|| missing("mkdir"))?;
            let created = session.make_directory(path).map_err(|e| format!("❌ mkdir: {e}"))?;
            outcome.merge(created);
            Ok(format!("📁 Created directory: {path} (+25 XP)"))
        }

        Command::Touch(path) => {
            let path = path.as_deref().ok_or_else(|| missing("touch"))?;
            let created = session.create_file(path, "").map_err(|e| format!("❌ touch: {e}"))?;
            outcome.merge(created);
            Ok(format!("📄 Created file: {path} (+10 XP)"))
        }

        Command::Cat(path) => {
            let path = path.as_deref().ok_or_else(|| missing("cat"))?;
            session
                .read_file(path)
                .map(str::to_string)
                .map_err(|e| format!("❌ cat: {e}"))
        }

        Command::Rm(path) => {
            let path = path.as_deref().ok_or_else(|| missing("rm"))?;
            let removed = session.remove(path).map_err(|e| format!("❌ rm: {e}"))?;
            let text = if removed.xp_gained > 0 {
                format!("🗑️ Removed: {path} (+{} XP)", removed.xp_gained)
            } else {
                format!("🗑️ Removed: {path}")
            };
            outcome.merge(removed);
            Ok(text)
        }

        Command::Ps => {
            let mut out = format!("{:<6} {:<15} {}\n", "PID", "NAME", "STATE");
            for p in session.processes() {
                let _ = writeln!(out, "{:<6} {:<15} {}", p.pid, p.name, p.state);
            }
            Ok(out.trim_end().to_string())
        }

        Command::Kill(arg) => {
            let arg = arg.as_deref().ok_or_else(|| missing("kill"))?;
            let pid: Pid = arg
                .parse()
                .map_err(|_| format!("❌ kill: {arg}: arguments must be process ids"))?;
            outcome.merge(session.kill_process(pid).map_err(|e| format!("❌ {e}"))?);
            Ok(format!("💀 Killed process {pid} (+20 XP)"))
        }

        Command::Top => {
            outcome.merge(session.monitor_system());
            outcome.merge(session.inspect_memory());
            let info = session.system_info();
            let m = info.memory;
            Ok(format!(
                "🖥️ {} {}\n\nUptime: {}\nProcesses: {} running\nMemory: {} KB / {} KB ({:.1}%)\nFree: {} KB",
                info.os_name,
                info.version,
                format_uptime(info.uptime_secs),
                info.active_processes,
                m.used_kb,
                m.total_kb,
                m.utilization,
                m.free_kb
            ))
        }

        Command::Stats => {
            outcome.merge(session.monitor_system());
            let p = session.progress();
            Ok(format!(
                "🎮 Your Gaming Stats:\n\n📊 Progress:\n  Level: {}\n  Total XP: {}\n  XP to next level: {}\n\n🏆 Achievements:\n  Unlocked: {}/{}\n\n📈 Activity:\n  Files Created: {}\n  Folders Created: {}\n  Processes Created: {}\n  Commands Executed: {}\n  Login Streak: {} days",
                p.level(),
                p.total_xp(),
                p.xp_to_next_level(),
                session.achievements().unlocked_count(),
                session.achievements().len(),
                p.files_created,
                p.directories_created,
                p.processes_created,
                p.commands_executed,
                p.login_streak
            ))
        }

        Command::Achievements => {
            let registry = session.achievements();
            let mut out = format!(
                "🏆 Achievements ({}/{}):\n",
                registry.unlocked_count(),
                registry.len()
            );
            for a in registry.iter() {
                let mark = if a.unlocked { a.icon.as_str() } else { "🔒" };
                let _ = writeln!(out, "{mark} {} - {} ({} XP)", a.name, a.description, a.xp_reward);
            }
            Ok(out.trim_end().to_string())
        }

        Command::Missions => {
            let mut out = String::from("🎯 Daily Missions:\n");
            for m in session.missions().iter() {
                let status = if m.completed { "✅" } else { "⏳" };
                let _ = writeln!(
                    out,
                    "{status} {} [{}] {} {}/{} (+{} XP)",
                    m.name,
                    m.difficulty,
                    bar(f64::from(m.ratio())),
                    m.progress,
                    m.target,
                    m.xp_reward
                );
            }
            Ok(out.trim_end().to_string())
        }

        Command::Level => {
            let p = session.level_progress();
            Ok(format!(
                "📈 Level Information:\n\nCurrent Level: {}\nProgress: [{}] {:.1}%\nCurrent XP: {}\nNeeded for next level: {}\nTotal XP: {}",
                session.progress().level(),
                bar(p.percentage / 100.0),
                p.percentage,
                p.current_xp_in_level,
                p.needed_xp_for_level.saturating_sub(p.current_xp_in_level),
                session.progress().total_xp()
            ))
        }

        Command::Unknown(name) => Err(format!(
            "❌ {name}: command not found (but you still got +5 XP!)"
        )),
    }
}

fn bar(ratio: f64) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64) as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

const HELP: &str = "🎮 GameOS Terminal Commands (+5 XP each):

📁 File System:
  ls [path]       - List files and directories
  cd <path>       - Change directory (+2 XP exploration bonus)
  pwd             - Show current directory
  mkdir <name>    - Create directory (+25 XP)
  touch <name>    - Create file (+10 XP)
  cat <file>      - Display file content
  rm <path>       - Remove file (+5 XP)

⚙️ Process Management:
  ps              - List processes
  kill <pid>      - Kill process (+20 XP)
  top             - Show system status

🎮 Gaming:
  stats           - Show your game stats
  achievements    - List achievements
  missions        - Show active missions
  level           - Show level info";
