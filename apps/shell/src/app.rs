use crate::command::{Command, HELP};
use anyhow::Result;
use regform_registration::{FormEvent, RegistrationForm, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::mpsc;
use tracing::{debug, info};

const PROMPT: &str = "> ";

/// Reads commands from stdin and echoes form state to stdout.
#[derive(Debug)]
pub(crate) struct Shell {
    form: RegistrationForm,
    out: Stdout,
}

impl Shell {
    pub(crate) fn new(form: RegistrationForm) -> Self {
        Self { form, out: tokio::io::stdout() }
    }

    /// Runs until `quit`, end of input or Ctrl-C, then disposes the form.
    pub(crate) async fn run(mut self) -> Result<()> {
        let (tx, mut events) = mpsc::unbounded_channel();
        self.form.subscribe(move |event| {
            let _ = tx.send(event.clone());
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        self.write(&format!("{}\n\n{HELP}\n", self.form.view())).await?;
        self.write(PROMPT).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(&line).await? {
                        break;
                    }
                    self.write(PROMPT).await?;
                },
                Some(event) = events.recv() => self.on_event(event).await?,
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                },
            }
        }

        self.form.dispose();
        Ok(())
    }

    /// Returns `false` when the shell should stop.
    async fn handle_line(&mut self, line: &str) -> Result<bool> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(e) => {
                self.write(&format!("{e}. Type `help` for commands.\n")).await?;
                return Ok(true);
            },
        };
        debug!(?command, "Command received");

        match command {
            Command::Set { field, value } => {
                self.form.set_field(field, value);
                let errors = self.form.errors(field);
                if errors.is_empty() {
                    self.write(&format!("{} ok\n", field.label())).await?;
                } else {
                    for error in errors {
                        self.write(&format!("! {error}\n")).await?;
                    }
                }
            },
            Command::Toggle => {
                let state = if self.form.toggle_password_visibility() { "shown" } else { "hidden" };
                self.write(&format!("Password {state}\n")).await?;
            },
            Command::Submit => match self.form.submit()? {
                SubmitOutcome::Started | SubmitOutcome::Rejected { .. } => {},
                SubmitOutcome::AlreadySubmitting => {
                    self.write("Already submitting, please wait\n").await?;
                },
            },
            Command::Show => self.write(&format!("{}\n", self.form.view())).await?,
            Command::Help => self.write(&format!("{HELP}\n")).await?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    async fn on_event(&mut self, event: FormEvent) -> Result<()> {
        match event {
            FormEvent::StrengthChanged { level } => {
                self.write(&format!("Password strength: {level}\n")).await
            },
            FormEvent::SubmissionStarted => self.write(&format!("{}\n", self.form.view())).await,
            FormEvent::SubmissionRejected { .. } => {
                let view = self.form.view();
                self.write(&format!("Please fix the errors below.\n{view}\n")).await
            },
            FormEvent::SubmissionFinished { succeeded } => {
                let status = if succeeded { "Registration submitted" } else { "Submission failed" };
                self.write(&format!("\n{status}, form cleared.\n{}\n{PROMPT}", self.form.view()))
                    .await
            },
            FormEvent::FieldChanged { .. } | FormEvent::VisibilityChanged { .. } => Ok(()),
        }
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await?;
        Ok(())
    }
}
