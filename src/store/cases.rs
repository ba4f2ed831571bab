use super::Store;
use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::{Case, CaseStatus, CaseUpdate, EntityType, NewCase};

impl<K: KeyValueStore> Store<K> {
    pub fn add_case(&mut self, new: NewCase) -> Result<Case> {
        let mut case = new.into_case();
        case.id = self.fresh_id(case.id);
        self.data.cases.push(case.clone());
        self.save()?;
        Ok(case)
    }

    pub fn get_case(&self, id: &str) -> Option<&Case> {
        self.data.cases.iter().find(|c| c.id == id)
    }

    pub fn list_cases(&self, status: Option<CaseStatus>) -> Vec<&Case> {
        self.data
            .cases
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .collect()
    }

    pub fn update_case(&mut self, id: &str, update: CaseUpdate) -> Result<Option<Case>> {
        let Some(case) = self.data.cases.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        update.apply(case);
        let updated = case.clone();
        self.save()?;
        Ok(Some(updated))
    }

    /// Delete a case. Tasks and contacts linked to it lose the link (and get
    /// a fresh `updated_at`); its insights are removed.
    pub fn delete_case(&mut self, id: &str) -> Result<bool> {
        let before = self.data.cases.len();
        self.data.cases.retain(|c| c.id != id);
        if self.data.cases.len() == before {
            return Ok(false);
        }

        for task in &mut self.data.tasks {
            task.unlink_case(id);
        }
        for contact in &mut self.data.contacts {
            contact.unlink_case(id);
        }
        self.remove_insights_for(id, EntityType::Case);
        self.save()?;
        Ok(true)
    }
}
