use super::Store;
use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::{EntityType, NewTask, Task, TaskStatus, TaskUpdate};

impl<K: KeyValueStore> Store<K> {
    // ==================== TASK CREATE ====================

    pub fn add_task(&mut self, new: NewTask) -> Result<Task> {
        let mut task = new.into_task();
        task.id = self.fresh_id(task.id);
        self.data.tasks.push(task.clone());
        self.save()?;
        Ok(task)
    }

    // ==================== TASK READ ====================

    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.data.tasks.iter().find(|t| t.id == id)
    }

    /// Tasks in stored order, optionally limited to one status
    pub fn list_tasks(&self, status: Option<TaskStatus>) -> Vec<&Task> {
        self.data
            .tasks
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .collect()
    }

    pub fn tasks_for_case(&self, case_id: &str) -> Vec<&Task> {
        self.data
            .tasks
            .iter()
            .filter(|t| t.case_ids.iter().any(|id| id == case_id))
            .collect()
    }

    // ==================== TASK UPDATE ====================

    /// Merge `update` into the task. Returns the updated task, or `None` if
    /// no task has that id.
    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Result<Option<Task>> {
        let Some(task) = self.data.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        update.apply(task);
        let updated = task.clone();
        self.save()?;
        Ok(Some(updated))
    }

    // ==================== TASK DELETE ====================

    /// Delete a task and every insight attached to it
    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let before = self.data.tasks.len();
        self.data.tasks.retain(|t| t.id != id);
        if self.data.tasks.len() == before {
            return Ok(false);
        }

        self.remove_insights_for(id, EntityType::Task);
        self.save()?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use crate::models::*;
    use crate::store::Store;

    fn store() -> Store<Database> {
        Store::open(Database::open_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_get_and_list() {
        let mut store = store();
        let a = store.add_task(NewTask::titled("a")).unwrap();
        store
            .add_task(NewTask {
                status: Some(TaskStatus::NextAction),
                ..NewTask::titled("b")
            })
            .unwrap();

        assert_eq!(store.get_task(&a.id).unwrap().title, "a");
        assert!(store.get_task("nope").is_none());
        assert_eq!(store.list_tasks(None).len(), 2);
        assert_eq!(store.list_tasks(Some(TaskStatus::NextAction)).len(), 1);
        assert_eq!(store.list_tasks(Some(TaskStatus::Done)).len(), 0);
    }

    #[test]
    fn test_update_task() {
        let mut store = store();
        let task = store.add_task(NewTask::titled("Draft")).unwrap();

        let updated = store
            .update_task(
                &task.id,
                TaskUpdate {
                    priority: Some(Priority::P1),
                    tags: Some(vec!["court".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.priority, Priority::P1);
        assert_eq!(updated.title, "Draft");
        assert!(updated.updated_at >= task.updated_at);
        assert_eq!(store.get_task(&task.id).unwrap().tags, vec!["court".to_string()]);
    }

    #[test]
    fn test_update_missing_task() {
        let mut store = store();
        assert!(store.update_task("ghost", TaskUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_tasks_for_case() {
        let mut store = store();
        store
            .add_task(NewTask {
                case_ids: vec!["c1".to_string()],
                ..NewTask::titled("linked")
            })
            .unwrap();
        store.add_task(NewTask::titled("unlinked")).unwrap();

        let linked = store.tasks_for_case("c1");
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].title, "linked");
    }

    #[test]
    fn test_delete_task_removes_its_insights() {
        let mut store = store();
        let task = store.add_task(NewTask::titled("t")).unwrap();
        store
            .add_insight(NewInsight {
                entity_id: task.id.clone(),
                entity_type: EntityType::Task,
                payload: InsightPayload::TaskEnhancement(TaskSuggestions::default()),
                confidence: 0.9,
            })
            .unwrap();

        assert!(store.delete_task(&task.id).unwrap());
        assert!(store.data().tasks.is_empty());
        assert!(store.data().ai_insights.is_empty());
        assert!(!store.delete_task(&task.id).unwrap());
    }
}
