use anyhow::Result;
use tracing::debug;

use super::settings::print_summary;
use super::AppStore;
use crate::models::NewTask;
use crate::voice::{parse_command, VoiceIntent};

/// Classify `text` and act on it. Only task creation and status are wired
/// to the store; other intents are reported back.
pub fn run_voice(store: &mut AppStore, text: &str) -> Result<()> {
    let command = parse_command(text);
    debug!(intent = command.intent.as_str(), subject = ?command.subject, "voice command");

    match command.intent {
        VoiceIntent::CreateTask => match command.subject {
            Some(title) => {
                let task = store.add_task(NewTask::titled(title))?;
                println!("Created task {}: {}", task.id, task.title);
            }
            None => println!("Heard a new task, but no title. Try: \"add task call the clerk\""),
        },
        VoiceIntent::GetStatus => print_summary(&store.summary()),
        other => println!("Understood \"{}\" ({}), no action taken.", command.text, other.as_str()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::store::Store;

    #[test]
    fn test_create_task_by_voice() {
        let mut store = Store::open(Database::open_memory().unwrap()).unwrap();
        run_voice(&mut store, "remind me to file the brief").unwrap();
        assert_eq!(store.data().tasks[0].title, "file the brief");
    }

    #[test]
    fn test_other_intents_do_not_write() {
        let mut store = Store::open(Database::open_memory().unwrap()).unwrap();
        run_voice(&mut store, "schedule a meeting with Ann").unwrap();
        run_voice(&mut store, "create task").unwrap();
        assert!(store.data().tasks.is_empty());
    }
}
