use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use super::display::{contact_row, print_heading};
use super::ui::confirm_delete;
use super::AppStore;
use crate::models::{Connections, ContactType, ContactUpdate, NewContact};

const CONTACT_TYPES: [&str; 5] = [
    "client",
    "opposing_counsel",
    "expert_witness",
    "court_personnel",
    "other",
];

#[derive(Subcommand)]
pub enum ContactCommand {
    /// Add a contact
    Add(ContactAddArgs),
    /// List contacts sorted by name
    List {
        #[arg(short = 't', long = "type", value_parser = CONTACT_TYPES)]
        contact_type: Option<String>,
    },
    /// Change fields of a contact
    Update(ContactUpdateArgs),
    /// Delete a contact
    Delete {
        id: String,
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct ContactAddArgs {
    pub first_name: String,
    #[arg(default_value = "")]
    pub last_name: String,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short = 't', long = "type", value_parser = CONTACT_TYPES)]
    pub contact_type: Option<String>,
    /// Case this contact is involved in (repeatable)
    #[arg(long = "case", value_name = "CASE_ID")]
    pub case_ids: Vec<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct ContactUpdateArgs {
    pub id: String,
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(short = 't', long = "type", value_parser = CONTACT_TYPES)]
    pub contact_type: Option<String>,
}

pub fn run_contact(store: &mut AppStore, cmd: ContactCommand) -> Result<()> {
    match cmd {
        ContactCommand::Add(args) => {
            let connections = if args.case_ids.is_empty() && args.notes.is_none() {
                None
            } else {
                Some(Connections {
                    case_ids: args.case_ids,
                    last_contacted: None,
                    notes: args.notes,
                })
            };
            let contact = store.add_contact(NewContact {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email,
                phone: args.phone,
                contact_type: args.contact_type.as_deref().map(ContactType::parse),
                connections,
            })?;
            println!("Added {} ({})", contact.display_name(), contact.id);
        }
        ContactCommand::List { contact_type } => {
            let contacts = store.list_contacts(contact_type.as_deref().map(ContactType::parse));
            if contacts.is_empty() {
                println!("No contacts.");
                return Ok(());
            }
            print_heading(&format!("CONTACTS ({})", contacts.len()));
            for contact in contacts {
                println!("{}", contact_row(contact));
            }
        }
        ContactCommand::Update(args) => {
            let update = ContactUpdate {
                first_name: args.first_name,
                last_name: args.last_name,
                email: args.email.map(Some),
                phone: args.phone.map(Some),
                contact_type: args.contact_type.as_deref().map(ContactType::parse),
                ..Default::default()
            };
            match store.update_contact(&args.id, update)? {
                Some(contact) => println!("Updated {}", contact.display_name()),
                None => return Err(anyhow!("No contact with id {}", args.id)),
            }
        }
        ContactCommand::Delete { id, force } => {
            let name = store
                .get_contact(&id)
                .map(|c| c.display_name())
                .ok_or_else(|| anyhow!("No contact with id {}", id))?;
            if !confirm_delete(&name, force)? {
                println!("Cancelled.");
                return Ok(());
            }
            store.delete_contact(&id)?;
            println!("Deleted.");
        }
    }
    Ok(())
}
