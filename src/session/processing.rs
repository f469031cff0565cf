use std::{io::Write, sync::Arc};

use anyhow::{anyhow, Result};
use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

use crate::{
    activities::{
        command::{ActivityCommand, Incoming},
        factory::{check_against, CommandFactory},
        store::ActivityStore,
        week::{Week, WeekGrid},
    },
    cli::output::{dashboard::render_dashboard, week_grid::render_week_grid},
    utils::time::{parse_day, DateStyle},
};

use super::request::{Request, SessionInput};

#[derive(Debug, Clone, Copy, Default)]
pub struct OutputSettings {
    pub date_style: DateStyle,
    pub colored: bool,
    /// Print state as JSON after changes instead of the dashboard.
    pub json: bool,
}

enum Flow {
    Continue,
    Quit,
}

/// Single owner of the session's store. Inputs are handled strictly one after another, so no
/// dispatch ever overlaps another.
pub struct SessionProcessor<W> {
    receiver: Receiver<SessionInput>,
    store: ActivityStore,
    factory: CommandFactory,
    settings: OutputSettings,
    out: W,
}

impl<W: Write> SessionProcessor<W> {
    pub fn new(
        receiver: Receiver<SessionInput>,
        store: ActivityStore,
        factory: CommandFactory,
        settings: OutputSettings,
        out: W,
    ) -> Self {
        Self {
            receiver,
            store,
            factory,
            settings,
            out,
        }
    }

    /// Runs until the input side goes away or `quit` arrives. Returns the final store.
    pub async fn run(mut self) -> Result<ActivityStore> {
        self.print_dashboard()?;
        while let Some(input) = self.receiver.recv().await {
            debug!("Processing input {:?}", input);
            match self.process_next(input) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => {
                    info!("Session ended by user");
                    break;
                }
                Err(e) => {
                    error!("Error processing input {e:?}");
                    writeln!(self.out, "error: {e}")?;
                }
            }
        }
        self.receiver.close();
        self.out.flush()?;
        Ok(self.store)
    }

    fn process_next(&mut self, input: SessionInput) -> Result<Flow> {
        match input {
            SessionInput::Request(request) => self.process_request(request),
            SessionInput::Wire(Incoming::Unrecognized(kind)) => {
                self.store.dispatch_incoming(Incoming::Unrecognized(kind.clone()));
                writeln!(self.out, "ignored unrecognized command {kind}")?;
                Ok(Flow::Continue)
            }
            SessionInput::Wire(Incoming::Command(command)) => {
                check_against(&self.store.state(), &command)?;
                self.apply(command)?;
                Ok(Flow::Continue)
            }
            SessionInput::Invalid(reason) => {
                warn!("Invalid input {reason}");
                writeln!(self.out, "{}", reason.trim_end())?;
                Ok(Flow::Continue)
            }
        }
    }

    fn process_request(&mut self, request: Request) -> Result<Flow> {
        let state = self.store.state();
        let clock = self.factory.clock();
        let command = match request {
            Request::Quit => return Ok(Flow::Quit),
            Request::Today => {
                self.print_dashboard()?;
                return Ok(Flow::Continue);
            }
            Request::Week { offset, only } => {
                let week = Week::current(clock)
                    .offset(offset.into())
                    .ok_or_else(|| anyhow!("Week offset {offset} is out of range"))?;
                let only = only.into_iter().map(Arc::from).collect::<Vec<_>>();
                let grid = WeekGrid::build(&state, &only, week, clock);
                write!(self.out, "{}", render_week_grid(&grid, self.settings.colored))?;
                return Ok(Flow::Continue);
            }
            Request::History => {
                for command in self.store.history() {
                    writeln!(self.out, "{}", serde_json::to_string(command)?)?;
                }
                return Ok(Flow::Continue);
            }
            Request::State => {
                writeln!(self.out, "{}", serde_json::to_string_pretty(&state)?)?;
                return Ok(Flow::Continue);
            }
            Request::Add {
                name,
                description,
                frequency,
            } => self
                .factory
                .add_activity(&name.join(" "), &description, frequency)?,
            Request::Delete { id } => self.factory.delete_activity(&state, &id)?,
            Request::Complete { id, on, notes } => {
                let day = match on {
                    Some(on) => parse_day(&on, clock, self.settings.date_style)?,
                    None => clock.today(),
                };
                self.factory
                    .complete_on(&state, &id, day, notes.as_deref())?
            }
            Request::Toggle { id, on, notes } => match on {
                Some(on) => {
                    let day = parse_day(&on, clock, self.settings.date_style)?;
                    self.factory
                        .toggle_on(&state, &id, day, notes.as_deref())?
                }
                None => self.factory.toggle_today(&state, &id, notes.as_deref())?,
            },
            Request::Uncomplete { completion_id } => {
                ActivityCommand::RemoveCompletion(completion_id.into())
            }
        };
        self.apply(command)?;
        Ok(Flow::Continue)
    }

    fn apply(&mut self, command: ActivityCommand) -> Result<()> {
        info!("Dispatching {}", command.kind());
        self.store.dispatch(command);
        if self.settings.json {
            writeln!(self.out, "{}", serde_json::to_string(&self.store.state())?)?;
            Ok(())
        } else {
            self.print_dashboard()
        }
    }

    fn print_dashboard(&mut self) -> Result<()> {
        let rendered = render_dashboard(
            &self.store.state(),
            self.factory.clock(),
            self.settings.colored,
        );
        writeln!(self.out, "{rendered}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tokio::sync::mpsc;

    use crate::{
        activities::{factory::CommandFactory, store::ActivityStore},
        session::request::{parse_line, SessionInput},
        utils::{clock::FixedClock, ids::UuidGenerator},
    };

    use super::{OutputSettings, SessionProcessor};

    fn clock() -> FixedClock {
        FixedClock::utc(Utc.with_ymd_and_hms(2025, 10, 22, 15, 0, 0).unwrap())
    }

    async fn run_lines(lines: &[&str], settings: OutputSettings) -> (ActivityStore, String) {
        let (sender, receiver) = mpsc::channel::<SessionInput>(16);
        for input in lines.iter().filter_map(|v| parse_line(v)) {
            sender.send(input).await.unwrap();
        }
        drop(sender);

        let clock = clock();
        let store = ActivityStore::seeded(&clock);
        let factory = CommandFactory::new(Box::new(UuidGenerator), Box::new(clock));
        let mut out = Vec::new();
        let store = SessionProcessor::new(receiver, store, factory, settings, &mut out)
            .run()
            .await
            .unwrap();
        (store, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn requests_change_state_in_order() {
        let (store, out) = run_lines(
            &[
                "add Evening walk -f weekly",
                "toggle 1 -n \"chapter 3\"",
                "complete 2 --on yesterday",
                "delete 3",
                r#"{"type": "NOT_A_REAL_ACTION"}"#,
            ],
            OutputSettings::default(),
        )
        .await;

        let state = store.state();
        let names = state.activities.iter().map(|v| &*v.name).collect::<Vec<_>>();
        assert_eq!(names, vec!["Reading", "Exercise", "Evening walk"]);
        assert_eq!(state.completions.len(), 2);
        assert_eq!(store.history().len(), 4);
        assert!(out.contains("1 activities completed today"));
        assert!(out.contains("Notes: chapter 3"));
        assert!(out.contains("ignored unrecognized command NOT_A_REAL_ACTION"));
    }

    #[tokio::test]
    async fn errors_do_not_end_the_session() {
        let (store, out) = run_lines(
            &["delete 42", "complete 1 --on \"not a date at all\"", "toggle 2"],
            OutputSettings::default(),
        )
        .await;

        assert!(out.contains("error: Activity 42 doesn't exist"));
        assert_eq!(store.state().completions.len(), 1);
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn week_offset_out_of_calendar_is_reported() {
        let (store, out) = run_lines(
            &["week --offset 20000000", "week --offset -20000000", "toggle 1", "week --offset -1"],
            OutputSettings::default(),
        )
        .await;

        assert!(out.contains("error: Week offset 20000000 is out of range"));
        assert!(out.contains("error: Week offset -20000000 is out of range"));
        assert!(out.contains("Week from 13-19 October 2025"));
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn wire_commands_must_fit_the_state() {
        let (store, out) = run_lines(
            &[
                r#"{"type": "COMPLETE_ACTIVITY", "payload": {"id": "c1", "activityId": "99", "completedAt": "2025-10-22T09:00:00Z", "createdAt": "2025-10-22T09:00:00Z"}}"#,
                r#"{"type": "ADD_ACTIVITY", "payload": {"id": "1", "name": "Reading again", "description": "", "targetFrequency": "daily", "createdAt": "2025-10-22T09:00:00Z"}}"#,
                r#"{"type": "ADD_ACTIVITY", "payload": {"id": "4", "name": " Stretching ", "description": "", "targetFrequency": "daily", "createdAt": "2025-10-22T09:00:00Z"}}"#,
            ],
            OutputSettings::default(),
        )
        .await;

        assert!(out.contains("error: Activity 99 doesn't exist"));
        assert!(out.contains("error: Identifier 1 is already taken"));
        let state = store.state();
        assert!(state.completions.is_empty());
        assert_eq!(state.activities.iter().filter(|v| &*v.id == "1").count(), 1);
        assert_eq!(state.activity("4").map(|v| &*v.name), Some("Stretching"));
        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn toggle_on_a_past_day_keeps_notes() {
        let (store, _) = run_lines(
            &["toggle 1 --on yesterday -n \"short one\""],
            OutputSettings::default(),
        )
        .await;

        let state = store.state();
        assert_eq!(state.completions.len(), 1);
        assert_eq!(state.completions[0].notes.as_deref(), Some("short one"));
        assert_eq!(
            state.completions[0].completed_at.date_naive(),
            chrono::NaiveDate::from_ymd_opt(2025, 10, 21).unwrap()
        );
    }

    #[tokio::test]
    async fn quit_stops_processing() {
        let (store, _) = run_lines(&["toggle 1", "quit", "toggle 2"], OutputSettings::default())
            .await;

        assert_eq!(store.history().len(), 1);
    }

    #[tokio::test]
    async fn json_mode_prints_state_after_changes() {
        let settings = OutputSettings {
            json: true,
            ..Default::default()
        };
        let (_, out) = run_lines(&["toggle 1"], settings).await;

        let last = out.lines().last().unwrap();
        let state: serde_json::Value = serde_json::from_str(last).unwrap();
        assert_eq!(state["completions"][0]["activityId"], "1");
    }
}
