//! Demo data for `--seed`.
//!
//! Records are written straight through the storage gateway rather than the
//! lifecycle services so the closed bug can carry all three timestamps.

use bugtrack_core::{
  Bug, Error, PageRequest, Project, Record, Repository, Result, Status,
  TrackerStore, User,
};

const PROBE: PageRequest = PageRequest { page: 0, size: 1 };

async fn is_empty<T: Record, S: Repository<T>>(store: &S) -> Result<bool> {
  let page = store.find_page(PROBE).await.map_err(Error::storage)?;
  Ok(page.total_elements == 0)
}

async fn insert<T: Record, S: Repository<T>>(store: &S, record: T) -> Result<i64> {
  let saved = store.save(record).await.map_err(Error::storage)?;
  saved
    .id()
    .ok_or_else(|| Error::storage(std::io::Error::other("store returned no id")))
}

fn user(name: &str, username: &str) -> User {
  User {
    id:       None,
    name:     name.to_string(),
    username: username.to_string(),
    email:    format!("{username}@bugtrack.test"),
    password: "changeme".to_string(),
  }
}

fn project(name: &str, description: &str, owner_id: i64) -> Project {
  Project {
    id: None,
    name: name.to_string(),
    description: Some(description.to_string()),
    status: Status::Open,
    owner_id,
  }
}

/// Insert three users, three projects and three bugs, unless any table
/// already holds data. Returns whether anything was written.
pub async fn seed_if_empty<S: TrackerStore>(store: &S) -> Result<bool> {
  let empty = is_empty::<User, _>(store).await?
    && is_empty::<Project, _>(store).await?
    && is_empty::<Bug, _>(store).await?;
  if !empty {
    tracing::info!("store already has data; skipping seed");
    return Ok(false);
  }

  let marta = insert(store, user("Marta Kowalski", "marta")).await?;
  let olu = insert(store, user("Oluwaseun Adeyemi", "olu")).await?;
  let jin = insert(store, user("Jin Park", "jin")).await?;

  let billing = insert(
    store,
    project("Billing", "Invoices, refunds and payment reconciliation", marta),
  )
  .await?;
  let mobile = insert(store, project("Mobile app", "iOS and Android clients", olu)).await?;
  insert(store, project("Docs site", "Public developer documentation", jin)).await?;

  let bugs = [
    Bug {
      id:          None,
      summary:     "Refund total ignores partial credits".to_string(),
      description: Some("Reproducible with any invoice that has a credit note.".to_string()),
      status:      Status::Open,
      project_id:  billing,
      creator_id:  olu,
      created_at:  Some("02/09/2024 10:15".to_string()),
      updated_at:  None,
      closed_at:   None,
    },
    Bug {
      id:          None,
      summary:     "Login screen freezes on rotation".to_string(),
      description: None,
      status:      Status::Open,
      project_id:  mobile,
      creator_id:  jin,
      created_at:  Some("05/09/2024 16:40".to_string()),
      updated_at:  Some("06/09/2024 09:05".to_string()),
      closed_at:   None,
    },
    Bug {
      id:          None,
      summary:     "Currency shown with three decimals".to_string(),
      description: Some("Only for JPY accounts.".to_string()),
      status:      Status::Closed,
      project_id:  billing,
      creator_id:  marta,
      created_at:  Some("28/08/2024 08:30".to_string()),
      updated_at:  Some("30/08/2024 14:00".to_string()),
      closed_at:   Some("30/08/2024 14:00".to_string()),
    },
  ];
  for bug in bugs {
    insert(store, bug).await?;
  }

  tracing::info!(users = 3, projects = 3, bugs = 3, "seeded demo data");
  Ok(true)
}
