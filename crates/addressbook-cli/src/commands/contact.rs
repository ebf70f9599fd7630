//! Contact command handlers

use anyhow::{anyhow, Context, Result};
use clap::Args;

use addressbook_core::{Contact, ContactId, ContactStore, FormFields};

use crate::output::Output;

/// Field values given on the command line
#[derive(Args, Debug, Clone, Default)]
pub struct ContactArgs {
    /// First name
    #[arg(long = "first")]
    pub first_name: Option<String>,
    /// Last name
    #[arg(long = "last")]
    pub last_name: Option<String>,
    /// Phone number
    #[arg(long = "phone")]
    pub phone_number: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub birth_date: Option<String>,
    /// Picture URL
    #[arg(long)]
    pub image: Option<String>,
}

impl ContactArgs {
    /// Overlay the given values on a contact, validating like the form does
    fn apply_to(&self, contact: &mut Contact) -> Result<()> {
        let mut fields = FormFields::read_contact(contact);
        let overlay = [
            (&self.first_name, &mut fields.first_name),
            (&self.last_name, &mut fields.last_name),
            (&self.phone_number, &mut fields.phone_number),
            (&self.email, &mut fields.email),
            (&self.birth_date, &mut fields.birth_date),
        ];
        for (given, field) in overlay {
            if let Some(value) = given {
                *field = value.clone();
            }
        }

        fields.write_contact(contact)?;
        if let Some(image) = &self.image {
            contact.image = image.clone();
        }
        Ok(())
    }
}

/// List contacts, optionally one page at a time
pub fn list(
    store: &ContactStore,
    limit: Option<usize>,
    offset: usize,
    output: &Output,
) -> Result<()> {
    let contacts = match limit {
        Some(limit) => store.page(limit, offset)?,
        None => store.list()?.into_iter().skip(offset).collect(),
    };

    output.print_contacts(&contacts)
}

/// Show a single contact
pub fn show(store: &ContactStore, id: ContactId, output: &Output) -> Result<()> {
    let contact = store
        .find_by_id(id)?
        .ok_or_else(|| anyhow!("Contact not found: {}", id))?;

    output.print_contact(&contact)
}

/// Create a contact with the next free id
pub fn add(store: &ContactStore, args: ContactArgs, output: &Output) -> Result<()> {
    let mut contact = Contact::new(0);
    args.apply_to(&mut contact)?;

    let contact = store
        .create_next(&contact)
        .context("Failed to create contact")?;

    output.success(&format!("Created contact {}", contact.id));
    output.print_contact(&contact)
}

/// Change the given fields of an existing contact
pub fn edit(store: &ContactStore, id: ContactId, args: ContactArgs, output: &Output) -> Result<()> {
    let mut contact = store
        .find_by_id(id)?
        .ok_or_else(|| anyhow!("Contact not found: {}", id))?;

    args.apply_to(&mut contact)?;
    store.update(&contact).context("Failed to update contact")?;

    output.success("Contact updated");
    output.print_contact(&contact)
}

/// Remove a contact
pub fn remove(store: &ContactStore, id: ContactId, output: &Output) -> Result<()> {
    if store.remove(id).context("Failed to remove contact")? {
        output.success(&format!("Removed contact {}", id));
    } else {
        output.message(&format!("No contact with id {}", id));
    }
    Ok(())
}
