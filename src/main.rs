use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use casebook::content::case::OTHER_INDETERMINATE;
use casebook::content::catalog::{CaseCatalog, DEFAULT_CONTENT_DIR};
use casebook::core::session::{CaseAction, CaseSnapshot, Session, SessionSnapshot};
use casebook::session::library::CaseLibrary;
use casebook::session::progress::SuspectStatus;
use casebook::session::registry::ViewTarget;
use casebook::systems::progression::{DecisionDraft, EnvelopeGate};

const COMMANDS: &str = "Commands: cases | switch <slug> | start | board | open <n> | confirm [n] | view <cover|envelopes|notebook|decision|closing> | notes <text> | hyp <text> | event <text> | suspects | status <n> <neutral|suspect|priority|dismissed> | snote <n> <text> | decide | closing | export | reset [all] | quit";

fn main() {
    init_tracing();

    let content_dir = parse_content_dir(env::args().collect());
    let catalog = CaseCatalog::new(&content_dir);
    let summaries = match catalog.list_cases() {
        Ok(summaries) => summaries,
        Err(err) => {
            eprintln!("No playable cases: {}", err);
            std::process::exit(1);
        }
    };
    println!(
        "Found {} case(s) under {}:",
        summaries.len(),
        content_dir.display()
    );
    for summary in &summaries {
        println!("  {} — {}", summary.slug, summary.title);
    }

    let cases = match catalog.load_all() {
        Ok(cases) => cases,
        Err(err) => {
            eprintln!("Failed to load cases: {}", err);
            std::process::exit(1);
        }
    };
    let mut session = Session::new(CaseLibrary::new(cases));

    println!("{}", COMMANDS);
    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or("").to_lowercase();
        let rest = trimmed
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest.trim())
            .unwrap_or("");

        match cmd.as_str() {
            "quit" | "exit" => break,
            "help" => println!("{}", COMMANDS),
            "cases" => {
                let snapshot = session.snapshot();
                let active = snapshot.case.as_ref().map(|case| case.slug.clone());
                for case in &session.library().cases {
                    let marker = if Some(&case.slug) == active.as_ref() {
                        "➡️ "
                    } else {
                        "   "
                    };
                    println!("{}{} — {}", marker, case.slug, case.title);
                }
            }
            "switch" => {
                if let Some(slug) = parts.next() {
                    let snapshot =
                        session.dispatch(vec![CaseAction::SwitchCase(slug.to_string())]);
                    print_events(&snapshot);
                } else {
                    println!("Usage: switch <slug>");
                }
            }
            "start" => {
                let snapshot = session.dispatch(vec![CaseAction::StartCase]);
                print_events(&snapshot);
                if let Some(case) = snapshot.case {
                    print_board(&case);
                }
            }
            "board" => match session.snapshot().case {
                Some(case) => print_board(&case),
                None => println!("No active case. Use `switch <slug>` first."),
            },
            "open" => {
                if let Some(Ok(id)) = parts.next().map(|raw| raw.parse::<u32>()) {
                    let snapshot = session.dispatch(vec![CaseAction::OpenEnvelope(id)]);
                    print_events(&snapshot);
                    if let Some(case) = snapshot.case {
                        print_current_envelope(&case);
                    }
                } else {
                    println!("Usage: open <envelope number>");
                }
            }
            "confirm" => {
                let id = match parts.next() {
                    Some(raw) => match raw.parse::<u32>() {
                        Ok(id) => Some(id),
                        Err(_) => {
                            println!("Usage: confirm [envelope number]");
                            continue;
                        }
                    },
                    None => session.snapshot().case.map(|case| case.current_envelope),
                };
                let Some(id) = id else {
                    println!("No active case. Use `switch <slug>` first.");
                    continue;
                };
                let snapshot = session.dispatch(vec![CaseAction::ConfirmReading(id)]);
                print_events(&snapshot);
            }
            "view" => match parts.next().and_then(parse_view) {
                Some(view) => {
                    let snapshot = session.dispatch(vec![CaseAction::SwitchView(view)]);
                    print_events(&snapshot);
                }
                None => println!("Usage: view <cover|envelopes|notebook|decision|closing>"),
            },
            "notes" => {
                let snapshot = session.dispatch(vec![CaseAction::SetNotes(rest.to_string())]);
                print_events(&snapshot);
            }
            "hyp" => {
                let snapshot = session.dispatch(vec![CaseAction::AddHypothesis(rest.to_string())]);
                print_events(&snapshot);
            }
            "event" => {
                let snapshot =
                    session.dispatch(vec![CaseAction::AddTimelineEvent(rest.to_string())]);
                print_events(&snapshot);
            }
            "suspects" => match session.snapshot().case {
                Some(case) => print_suspects(&case),
                None => println!("No active case. Use `switch <slug>` first."),
            },
            "status" => {
                let index = parts.next().and_then(|raw| raw.parse::<usize>().ok());
                let status = parts.next().and_then(parse_status);
                match (index, status, session.snapshot().case) {
                    (Some(index), Some(status), Some(case)) => {
                        match case.suspects.get(index.wrapping_sub(1)) {
                            Some(suspect) => {
                                let snapshot =
                                    session.dispatch(vec![CaseAction::SetSuspectStatus {
                                        name: suspect.name.clone(),
                                        status,
                                    }]);
                                print_events(&snapshot);
                            }
                            None => println!("No suspect number {}. Try `suspects`.", index),
                        }
                    }
                    _ => println!(
                        "Usage: status <suspect number> <neutral|suspect|priority|dismissed>"
                    ),
                }
            }
            "snote" => {
                let index = parts.next().and_then(|raw| raw.parse::<usize>().ok());
                let text = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, text)| text.trim())
                    .unwrap_or("");
                match (index, session.snapshot().case) {
                    (Some(index), Some(case)) => {
                        match case.suspects.get(index.wrapping_sub(1)) {
                            Some(suspect) => {
                                let snapshot =
                                    session.dispatch(vec![CaseAction::SetSuspectNotes {
                                        name: suspect.name.clone(),
                                        notes: text.to_string(),
                                    }]);
                                print_events(&snapshot);
                            }
                            None => println!("No suspect number {}. Try `suspects`.", index),
                        }
                    }
                    _ => println!("Usage: snote <suspect number> <text>"),
                }
            }
            "decide" => {
                let Some(case) = session.snapshot().case else {
                    println!("No active case. Use `switch <slug>` first.");
                    continue;
                };
                if !case.can_decide {
                    println!(
                        "Decision locked: confirm reading through envelope {} first.",
                        case.envelopes.len()
                    );
                    continue;
                }
                let draft = collect_decision(&case);
                let snapshot = session.dispatch(vec![CaseAction::SubmitDecision(draft)]);
                print_events(&snapshot);
                if let Some(case) = snapshot.case {
                    if let Some(decision) = &case.decision {
                        println!("Recorded: {} — {}", decision.culprit, decision.method);
                    }
                }
            }
            "closing" => {
                let snapshot = session.dispatch(vec![CaseAction::SwitchView(ViewTarget::Closing)]);
                match snapshot.case.as_ref().and_then(|case| case.closing.as_ref()) {
                    Some(closing) => {
                        println!("== {} ==", closing.title);
                        println!("{}", closing.body);
                    }
                    None => println!("The closing stays locked until you submit your decision."),
                }
            }
            "export" => match serde_json::to_string_pretty(&session.snapshot()) {
                Ok(raw) => println!("{}", raw),
                Err(err) => println!("Export failed: {}", err),
            },
            "reset" => {
                let action = if matches!(parts.next(), Some("all")) {
                    CaseAction::ResetAll
                } else {
                    CaseAction::ResetCase
                };
                let snapshot = session.dispatch(vec![action]);
                print_events(&snapshot);
            }
            _ => println!("Unknown command: {}. Try `help`.", cmd),
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(env_filter)
        .init();
}

fn parse_content_dir(args: Vec<String>) -> PathBuf {
    let mut iter = args.iter();
    let mut content_dir = PathBuf::from(DEFAULT_CONTENT_DIR);
    while let Some(arg) = iter.next() {
        if arg.as_str() == "--content" {
            if let Some(value) = iter.next() {
                content_dir = PathBuf::from(value);
            }
        }
    }
    content_dir
}

fn print_events(snapshot: &SessionSnapshot) {
    for line in &snapshot.events {
        println!("{}", line);
    }
}

fn print_board(case: &CaseSnapshot) {
    println!("== {} ==", case.title);
    if !case.subtitle.is_empty() {
        println!("{}", case.subtitle);
    }
    if !case.started {
        println!("Not started. Use `start` to unlock envelope 1.");
        return;
    }
    println!(
        "Progress: {}% ({}/{} envelopes)",
        case.progress_percent,
        case.max_opened_envelope,
        case.envelopes.len()
    );
    for envelope in &case.envelopes {
        let marker = match envelope.gate {
            EnvelopeGate::Locked => "🔒",
            EnvelopeGate::Open => "📩",
            EnvelopeGate::Confirmed => "✅",
        };
        let active = if envelope.id == case.current_envelope {
            " ⟵ reading"
        } else {
            ""
        };
        println!("  {} Envelope {}{}", marker, envelope.id, active);
    }
    println!(
        "Decision: {}",
        if case.decision.is_some() { "✅" } else { "—" }
    );
}

fn print_current_envelope(case: &CaseSnapshot) {
    match &case.current {
        Some(envelope) => {
            println!("== Envelope {} — {} ==", envelope.id, envelope.title);
            println!("{}", envelope.body);
        }
        None => println!("Not started. Use `start` to unlock envelope 1."),
    }
}

fn print_suspects(case: &CaseSnapshot) {
    for (index, suspect) in case.suspects.iter().enumerate() {
        println!(
            "{}. {} {} — {}",
            index + 1,
            suspect.badge,
            suspect.name,
            suspect.status
        );
        if !suspect.notes.is_empty() {
            println!("     {}", suspect.notes);
        }
    }
}

fn collect_decision(case: &CaseSnapshot) -> DecisionDraft {
    println!("Suspects:");
    for (index, suspect) in case.suspects.iter().enumerate() {
        println!("  {}. {}", index + 1, suspect.name);
    }
    println!("  0. {}", OTHER_INDETERMINATE);

    let culprit_raw = prompt_line("Culprit (number or exact name)");
    let culprit = match culprit_raw.parse::<usize>() {
        Ok(0) => OTHER_INDETERMINATE.to_string(),
        Ok(number) => case
            .suspects
            .get(number - 1)
            .map(|suspect| suspect.name.clone())
            .unwrap_or(culprit_raw),
        Err(_) => culprit_raw,
    };

    DecisionDraft {
        culprit,
        method: prompt_line("Method"),
        motive: prompt_line("Motive"),
        reasoning: prompt_line("Reasoning"),
    }
}

fn prompt_line(label: &str) -> String {
    print!("{}: ", label);
    io::stdout().flush().unwrap();
    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return String::new();
    }
    input.trim().to_string()
}

fn parse_status(raw: &str) -> Option<SuspectStatus> {
    match raw.to_lowercase().as_str() {
        "neutral" => Some(SuspectStatus::Neutral),
        "suspect" => Some(SuspectStatus::Suspect),
        "priority" => Some(SuspectStatus::Priority),
        "dismissed" => Some(SuspectStatus::Dismissed),
        _ => None,
    }
}

fn parse_view(raw: &str) -> Option<ViewTarget> {
    match raw.to_lowercase().as_str() {
        "cover" => Some(ViewTarget::Cover),
        "envelopes" => Some(ViewTarget::Envelopes),
        "notebook" => Some(ViewTarget::Notebook),
        "decision" => Some(ViewTarget::Decision),
        "closing" => Some(ViewTarget::Closing),
        _ => None,
    }
}
