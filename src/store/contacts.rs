use super::Store;
use crate::db::KeyValueStore;
use crate::error::Result;
use crate::models::{Contact, ContactType, ContactUpdate, EntityType, NewContact};

impl<K: KeyValueStore> Store<K> {
    pub fn add_contact(&mut self, new: NewContact) -> Result<Contact> {
        let mut contact = new.into_contact();
        contact.id = self.fresh_id(contact.id);
        self.data.contacts.push(contact.clone());
        self.save()?;
        Ok(contact)
    }

    pub fn get_contact(&self, id: &str) -> Option<&Contact> {
        self.data.contacts.iter().find(|c| c.id == id)
    }

    /// Contacts sorted by last then first name
    pub fn list_contacts(&self, contact_type: Option<ContactType>) -> Vec<&Contact> {
        let mut contacts: Vec<&Contact> = self
            .data
            .contacts
            .iter()
            .filter(|c| contact_type.map_or(true, |t| c.contact_type == t))
            .collect();
        contacts.sort_by(|a, b| {
            (a.last_name.to_lowercase(), a.first_name.to_lowercase())
                .cmp(&(b.last_name.to_lowercase(), b.first_name.to_lowercase()))
        });
        contacts
    }

    pub fn update_contact(&mut self, id: &str, update: ContactUpdate) -> Result<Option<Contact>> {
        let Some(contact) = self.data.contacts.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        update.apply(contact);
        let updated = contact.clone();
        self.save()?;
        Ok(Some(updated))
    }

    pub fn delete_contact(&mut self, id: &str) -> Result<bool> {
        let before = self.data.contacts.len();
        self.data.contacts.retain(|c| c.id != id);
        if self.data.contacts.len() == before {
            return Ok(false);
        }

        self.remove_insights_for(id, EntityType::Contact);
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

    fn person(first: &str, last: &str, contact_type: ContactType) -> NewContact {
        NewContact {
            first_name: first.to_string(),
            last_name: last.to_string(),
            contact_type: Some(contact_type),
            ..Default::default()
        }
    }

    #[test]
    fn test_list_sorted_and_filtered() {
        let mut store = store();
        store.add_contact(person("Zoe", "Adams", ContactType::Client)).unwrap();
        store.add_contact(person("Al", "baker", ContactType::ExpertWitness)).unwrap();
        store.add_contact(person("Amy", "Adams", ContactType::Client)).unwrap();

        let names: Vec<String> = store.list_contacts(None).iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["Amy Adams", "Zoe Adams", "Al baker"]);
        assert_eq!(store.list_contacts(Some(ContactType::Client)).len(), 2);
    }

    #[test]
    fn test_update_contact() {
        let mut store = store();
        let c = store.add_contact(person("Sam", "Lee", ContactType::Other)).unwrap();
        let updated = store
            .update_contact(
                &c.id,
                ContactUpdate {
                    email: Some(Some("sam@example.com".to_string())),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("sam@example.com"));
    }

    #[test]
    fn test_delete_contact_removes_insights() {
        let mut store = store();
        let c = store.add_contact(person("Sam", "Lee", ContactType::Client)).unwrap();
        store
            .add_insight(NewInsight {
                entity_id: c.id.clone(),
                entity_type: EntityType::Contact,
                payload: InsightPayload::CrossConnection {
                    related_entity_id: "case-1".to_string(),
                    related_entity_type: EntityType::Case,
                    relationship: "witness in".to_string(),
                },
                confidence: 0.6,
            })
            .unwrap();

        assert!(store.delete_contact(&c.id).unwrap());
        assert!(store.data().ai_insights.is_empty());
    }
}
