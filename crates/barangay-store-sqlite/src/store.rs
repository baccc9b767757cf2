//! [`SqliteStore`]: the SQLite implementation of [`RegistryStore`] and
//! [`SessionStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use barangay_core::{
  household::{HouseholdFields, HouseholdView, NewHousehold},
  ident::{EntityKind, next_identifier},
  query::{HouseholdQuery, ListOrder, Page, ResidentQuery, Scope},
  resident::{NewResident, Resident, ResidentFields},
  staff::{NewStaff, Staff, StaffCredentials},
  store::{RegistryCounts, RegistryStore, SessionStore},
};

use crate::{
  Error, Result,
  encode::{
    HOUSEHOLD_COLUMNS, HOUSEHOLD_FROM, HouseholdRow, RESIDENT_COLUMNS, RawHousehold,
    RawResident, RawStaff, ResidentRow, STAFF_COLUMNS, encode_dt,
  },
  query::Filter,
  schema::SCHEMA,
};

/// Result of work inside a connection closure that may fail with a domain
/// error rather than a database one.
type Outcome<T> = std::result::Result<T, barangay_core::Error>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// The barangay registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }
}

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn active_clause(alias: &str, scope: Scope) -> String {
  match scope {
    Scope::Active => format!("AND {alias}.is_active = 1"),
    Scope::All => String::new(),
  }
}

fn fetch_resident(
  conn: &rusqlite::Connection,
  id: i64,
  scope: Scope,
) -> rusqlite::Result<Option<RawResident>> {
  let sql = format!(
    "SELECT {RESIDENT_COLUMNS} FROM residents r WHERE r.id = ?1 {}",
    active_clause("r", scope)
  );
  conn
    .query_row(&sql, rusqlite::params![id], RawResident::from_row)
    .optional()
}

fn fetch_household(
  conn: &rusqlite::Connection,
  id: i64,
  scope: Scope,
) -> rusqlite::Result<Option<RawHousehold>> {
  let sql = format!(
    "SELECT {HOUSEHOLD_COLUMNS} FROM {HOUSEHOLD_FROM} WHERE h.id = ?1 {}",
    active_clause("h", scope)
  );
  conn
    .query_row(&sql, rusqlite::params![id], RawHousehold::from_row)
    .optional()
}

fn fetch_residents(
  conn: &rusqlite::Connection,
  condition: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<RawResident>> {
  let sql = format!(
    "SELECT {RESIDENT_COLUMNS} FROM residents r
     WHERE r.is_active = 1 AND {condition}
     ORDER BY r.last_name, r.first_name, r.id"
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params, RawResident::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()
}

fn count(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<u64> {
  let n: i64 = conn.query_row(sql, params, |r| r.get(0))?;
  Ok(u64::try_from(n).unwrap_or_default())
}

fn distinct_puroks(conn: &rusqlite::Connection, table: &str) -> rusqlite::Result<Vec<String>> {
  let sql = format!(
    "SELECT DISTINCT purok FROM {table} WHERE is_active = 1 ORDER BY purok"
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map([], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()
}

/// The identifier most recently handed out for `kind`, by insertion order.
fn last_identifier(
  conn: &rusqlite::Connection,
  kind: EntityKind,
) -> rusqlite::Result<Option<String>> {
  let sql = match kind {
    EntityKind::Resident => "SELECT resident_id FROM residents ORDER BY id DESC LIMIT 1",
    EntityKind::Household => "SELECT household_id FROM households ORDER BY id DESC LIMIT 1",
  };
  conn.query_row(sql, [], |r| r.get(0)).optional()
}

/// Use the caller's identifier if given, otherwise the next in sequence.
fn assign_identifier(
  conn: &rusqlite::Connection,
  kind: EntityKind,
  supplied: Option<String>,
) -> rusqlite::Result<Outcome<String>> {
  match supplied {
    Some(id) if kind.is_well_formed(&id) => Ok(Ok(id)),
    Some(id) => Ok(Err(barangay_core::Error::InvalidIdentifierFormat(id))),
    None => {
      let last = last_identifier(conn, kind)?;
      Ok(next_identifier(kind, last.as_deref()))
    }
  }
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = Error;

  // ── Identifiers ───────────────────────────────────────────────────────────

  async fn next_id(&self, kind: EntityKind) -> Result<String> {
    let last = self
      .conn
      .call(move |conn| Ok(last_identifier(conn, kind)?))
      .await?;
    Ok(next_identifier(kind, last.as_deref())?)
  }

  // ── Residents ─────────────────────────────────────────────────────────────

  async fn create_resident(&self, input: NewResident) -> Result<Resident> {
    let row = ResidentRow::from(input.fields);
    let supplied = input.resident_id;
    let created_by = input.created_by;
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock before the last identifier is
        // read, so no other writer can claim the same one.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let resident_id = match assign_identifier(&tx, EntityKind::Resident, supplied)? {
          Ok(id) => id,
          Err(e) => return Ok(Err(e)),
        };

        tx.execute(
          "INSERT INTO residents (
             resident_id, first_name, middle_name, last_name, suffix,
             date_of_birth, gender, civil_status, phone_number, email,
             purok, street, household_id, relationship_to_head,
             is_pwd, is_senior, is_4ps, employment_status, occupation,
             notes, created_by, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?22)",
          rusqlite::params![
            resident_id,
            row.first_name,
            row.middle_name,
            row.last_name,
            row.suffix,
            row.date_of_birth,
            row.gender,
            row.civil_status,
            row.phone_number,
            row.email,
            row.purok,
            row.street,
            row.household,
            row.relationship_to_head,
            row.is_pwd,
            row.is_senior,
            row.is_4ps,
            row.employment_status,
            row.occupation,
            row.notes,
            created_by,
            now,
          ],
        )?;
        let id = tx.last_insert_rowid();
        let raw = fetch_resident(&tx, id, Scope::All)?;
        tx.commit()?;
        Ok(raw.ok_or_else(|| barangay_core::Error::not_found(EntityKind::Resident, id)))
      })
      .await
      .map_err(|e| Error::from_write(e, "household"))??;

    raw.into_resident()
  }

  async fn get_resident(&self, id: i64, scope: Scope) -> Result<Option<Resident>> {
    let raw = self
      .conn
      .call(move |conn| Ok(fetch_resident(conn, id, scope)?))
      .await?;
    raw.map(RawResident::into_resident).transpose()
  }

  async fn update_resident(&self, id: i64, fields: ResidentFields) -> Result<Resident> {
    let row = ResidentRow::from(fields);
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE residents SET
             first_name = ?2, middle_name = ?3, last_name = ?4, suffix = ?5,
             date_of_birth = ?6, gender = ?7, civil_status = ?8,
             phone_number = ?9, email = ?10, purok = ?11, street = ?12,
             household_id = ?13, relationship_to_head = ?14,
             is_pwd = ?15, is_senior = ?16, is_4ps = ?17,
             employment_status = ?18, occupation = ?19, notes = ?20,
             updated_at = ?21
           WHERE id = ?1 AND is_active = 1",
          rusqlite::params![
            id,
            row.first_name,
            row.middle_name,
            row.last_name,
            row.suffix,
            row.date_of_birth,
            row.gender,
            row.civil_status,
            row.phone_number,
            row.email,
            row.purok,
            row.street,
            row.household,
            row.relationship_to_head,
            row.is_pwd,
            row.is_senior,
            row.is_4ps,
            row.employment_status,
            row.occupation,
            row.notes,
            now,
          ],
        )?;
        if changed == 0 {
          return Ok(Err(barangay_core::Error::not_found(EntityKind::Resident, id)));
        }
        let raw = fetch_resident(conn, id, Scope::All)?;
        Ok(raw.ok_or_else(|| barangay_core::Error::not_found(EntityKind::Resident, id)))
      })
      .await
      .map_err(|e| Error::from_write(e, "household"))??;

    raw.into_resident()
  }

  async fn deactivate_resident(&self, id: i64) -> Result<()> {
    let now = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE residents SET is_active = 0, updated_at = ?2
           WHERE id = ?1 AND is_active = 1",
          rusqlite::params![id, now],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(barangay_core::Error::not_found(EntityKind::Resident, id).into());
    }
    Ok(())
  }

  async fn list_residents<'a>(&'a self, query: &'a ResidentQuery) -> Result<Page<Resident>> {
    let mut filter = Filter::new("r", query.scope);
    if let Some(term) = &query.search {
      filter.search(
        &["r.first_name", "r.last_name", "r.resident_id", "r.phone_number"],
        term,
      );
    }
    if let Some(purok) = &query.purok {
      filter.eq("r.purok", purok.clone());
    }
    if let Some(gender) = query.gender {
      filter.eq("r.gender", gender.to_string());
    }
    let order = match query.order {
      ListOrder::Newest => "r.created_at DESC, r.id DESC",
      ListOrder::Canonical => "r.last_name, r.first_name, r.id",
    };
    let page = query.page;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        let where_clause = filter.where_clause();
        let total = count(
          conn,
          &format!("SELECT COUNT(*) FROM residents r {where_clause}"),
          filter.params(),
        )?;
        let Some(offset) = page.offset() else {
          return Ok((total, Vec::new()));
        };

        let sql = format!(
          "SELECT {RESIDENT_COLUMNS} FROM residents r {where_clause}
           ORDER BY {order} LIMIT {} OFFSET {offset}",
          barangay_core::query::PAGE_SIZE
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(filter.params(), RawResident::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawResident::into_resident)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, total, page))
  }

  async fn resident_puroks(&self) -> Result<Vec<String>> {
    Ok(
      self
        .conn
        .call(|conn| Ok(distinct_puroks(conn, "residents")?))
        .await?,
    )
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn assign_household(
    &self,
    resident: i64,
    household: Option<i64>,
    relationship_to_head: String,
  ) -> Result<Resident> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE residents SET household_id = ?2, relationship_to_head = ?3, updated_at = ?4
           WHERE id = ?1 AND is_active = 1",
          rusqlite::params![resident, household, relationship_to_head, now],
        )?;
        if changed == 0 {
          return Ok(Err(barangay_core::Error::not_found(EntityKind::Resident, resident)));
        }
        let raw = fetch_resident(conn, resident, Scope::All)?;
        Ok(raw.ok_or_else(|| barangay_core::Error::not_found(EntityKind::Resident, resident)))
      })
      .await
      .map_err(|e| Error::from_write(e, "household"))??;

    raw.into_resident()
  }

  async fn set_household_head(
    &self,
    household: i64,
    head: Option<i64>,
  ) -> Result<HouseholdView> {
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE households SET household_head_id = ?2, updated_at = ?3
           WHERE id = ?1 AND is_active = 1",
          rusqlite::params![household, head, now],
        )?;
        if changed == 0 {
          return Ok(Err(barangay_core::Error::not_found(EntityKind::Household, household)));
        }
        let raw = fetch_household(conn, household, Scope::All)?;
        Ok(raw.ok_or_else(|| barangay_core::Error::not_found(EntityKind::Household, household)))
      })
      .await
      .map_err(|e| Error::from_write(e, "household_head"))??;

    raw.into_view()
  }

  async fn household_members(&self, household: i64) -> Result<Vec<Resident>> {
    let raws = self
      .conn
      .call(move |conn| {
        Ok(fetch_residents(conn, "r.household_id = ?1", rusqlite::params![household])?)
      })
      .await?;
    raws.into_iter().map(RawResident::into_resident).collect()
  }

  async fn member_count(&self, household: i64) -> Result<u32> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(count(
          conn,
          "SELECT COUNT(*) FROM residents WHERE household_id = ?1 AND is_active = 1",
          rusqlite::params![household],
        )?)
      })
      .await?;
    Ok(u32::try_from(n).unwrap_or(u32::MAX))
  }

  async fn unassigned_residents(&self) -> Result<Vec<Resident>> {
    let raws = self
      .conn
      .call(|conn| Ok(fetch_residents(conn, "r.household_id IS NULL", [])?))
      .await?;
    raws.into_iter().map(RawResident::into_resident).collect()
  }

  // ── Households ────────────────────────────────────────────────────────────

  async fn create_household(&self, input: NewHousehold) -> Result<HouseholdView> {
    let row = HouseholdRow::from(input.fields);
    let supplied = input.household_id;
    let created_by = input.created_by;
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let household_id = match assign_identifier(&tx, EntityKind::Household, supplied)? {
          Ok(id) => id,
          Err(e) => return Ok(Err(e)),
        };

        tx.execute(
          "INSERT INTO households (
             household_id, household_head_id, street, purok, housing_type,
             housing_condition, has_electricity, has_water, water_source,
             monthly_income, notes, created_by, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
          rusqlite::params![
            household_id,
            row.household_head,
            row.street,
            row.purok,
            row.housing_type,
            row.housing_condition,
            row.has_electricity,
            row.has_water,
            row.water_source,
            row.monthly_income,
            row.notes,
            created_by,
            now,
          ],
        )?;
        let id = tx.last_insert_rowid();
        let raw = fetch_household(&tx, id, Scope::All)?;
        tx.commit()?;
        Ok(raw.ok_or_else(|| barangay_core::Error::not_found(EntityKind::Household, id)))
      })
      .await
      .map_err(|e| Error::from_write(e, "household_head"))??;

    raw.into_view()
  }

  async fn get_household(&self, id: i64, scope: Scope) -> Result<Option<HouseholdView>> {
    let raw = self
      .conn
      .call(move |conn| Ok(fetch_household(conn, id, scope)?))
      .await?;
    raw.map(RawHousehold::into_view).transpose()
  }

  async fn update_household(&self, id: i64, fields: HouseholdFields) -> Result<HouseholdView> {
    let row = HouseholdRow::from(fields);
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE households SET
             household_head_id = ?2, street = ?3, purok = ?4, housing_type = ?5,
             housing_condition = ?6, has_electricity = ?7, has_water = ?8,
             water_source = ?9, monthly_income = ?10, notes = ?11, updated_at = ?12
           WHERE id = ?1 AND is_active = 1",
          rusqlite::params![
            id,
            row.household_head,
            row.street,
            row.purok,
            row.housing_type,
            row.housing_condition,
            row.has_electricity,
            row.has_water,
            row.water_source,
            row.monthly_income,
            row.notes,
            now,
          ],
        )?;
        if changed == 0 {
          return Ok(Err(barangay_core::Error::not_found(EntityKind::Household, id)));
        }
        let raw = fetch_household(conn, id, Scope::All)?;
        Ok(raw.ok_or_else(|| barangay_core::Error::not_found(EntityKind::Household, id)))
      })
      .await
      .map_err(|e| Error::from_write(e, "household_head"))??;

    raw.into_view()
  }

  async fn deactivate_household(&self, id: i64) -> Result<()> {
    let now = encode_dt(Utc::now());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE households SET is_active = 0, updated_at = ?2
           WHERE id = ?1 AND is_active = 1",
          rusqlite::params![id, now],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(barangay_core::Error::not_found(EntityKind::Household, id).into());
    }
    Ok(())
  }

  async fn list_households<'a>(
    &'a self,
    query: &'a HouseholdQuery,
  ) -> Result<Page<HouseholdView>> {
    let mut filter = Filter::new("h", query.scope);
    if let Some(term) = &query.search {
      filter.search(
        &["h.household_id", "h.street", "hd.first_name", "hd.last_name"],
        term,
      );
    }
    if let Some(purok) = &query.purok {
      filter.eq("h.purok", purok.clone());
    }
    let order = match query.order {
      ListOrder::Newest => "h.created_at DESC, h.id DESC",
      ListOrder::Canonical => "h.household_id, h.id",
    };
    let page = query.page;

    let (total, raws) = self
      .conn
      .call(move |conn| {
        let where_clause = filter.where_clause();
        let total = count(
          conn,
          &format!("SELECT COUNT(*) FROM {HOUSEHOLD_FROM} {where_clause}"),
          filter.params(),
        )?;
        let Some(offset) = page.offset() else {
          return Ok((total, Vec::new()));
        };

        let sql = format!(
          "SELECT {HOUSEHOLD_COLUMNS} FROM {HOUSEHOLD_FROM} {where_clause}
           ORDER BY {order} LIMIT {} OFFSET {offset}",
          barangay_core::query::PAGE_SIZE
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(filter.params(), RawHousehold::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawHousehold::into_view)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, total, page))
  }

  async fn household_puroks(&self) -> Result<Vec<String>> {
    Ok(
      self
        .conn
        .call(|conn| Ok(distinct_puroks(conn, "households")?))
        .await?,
    )
  }

  // ── Totals ────────────────────────────────────────────────────────────────

  async fn counts(&self) -> Result<RegistryCounts> {
    Ok(
      self
        .conn
        .call(|conn| {
          Ok(RegistryCounts {
            residents:  count(conn, "SELECT COUNT(*) FROM residents WHERE is_active = 1", [])?,
            households: count(conn, "SELECT COUNT(*) FROM households WHERE is_active = 1", [])?,
          })
        })
        .await?,
    )
  }
}

// ─── SessionStore impl ───────────────────────────────────────────────────────

impl SessionStore for SqliteStore {
  type Error = Error;

  async fn upsert_staff(&self, input: NewStaff) -> Result<Staff> {
    let role = input.role.to_string();
    let now = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO staff (username, full_name, role, password_hash, is_active, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
           ON CONFLICT(username) DO UPDATE SET
             full_name     = excluded.full_name,
             role          = excluded.role,
             password_hash = excluded.password_hash,
             is_active     = 1,
             updated_at    = excluded.updated_at",
          rusqlite::params![input.username, input.full_name, role, input.password_hash, now],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {STAFF_COLUMNS} FROM staff s WHERE s.username = ?1"),
          rusqlite::params![input.username],
          RawStaff::from_row,
        )?)
      })
      .await?;

    raw.into_staff()
  }

  async fn staff_credentials<'a>(&'a self, username: &'a str) -> Result<Option<StaffCredentials>> {
    let username = username.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {STAFF_COLUMNS}, s.password_hash FROM staff s
                 WHERE s.username = ?1 AND s.is_active = 1"
              ),
              rusqlite::params![username],
              |row| Ok((RawStaff::from_row(row)?, row.get::<_, String>(6)?)),
            )
            .optional()?,
        )
      })
      .await?;

    found
      .map(|(raw, password_hash)| {
        Ok(StaffCredentials { staff: raw.into_staff()?, password_hash })
      })
      .transpose()
  }

  async fn active_staff_count(&self) -> Result<u64> {
    Ok(
      self
        .conn
        .call(|conn| Ok(count(conn, "SELECT COUNT(*) FROM staff WHERE is_active = 1", [])?))
        .await?,
    )
  }

  async fn create_session(
    &self,
    token_hash: String,
    staff_id: i64,
    expires_at: DateTime<Utc>,
  ) -> Result<()> {
    let now = encode_dt(Utc::now());
    let expires = encode_dt(expires_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, staff_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![token_hash, staff_id, now, expires],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn resolve_session(
    &self,
    token_hash: String,
    now: DateTime<Utc>,
  ) -> Result<Option<Staff>> {
    let now = encode_dt(now);

    let raw = self
      .conn
      .call(move |conn| {
        let purged =
          conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", rusqlite::params![now])?;
        if purged > 0 {
          tracing::debug!(purged, "removed expired sessions");
        }
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {STAFF_COLUMNS} FROM sessions x
                 JOIN staff s ON s.id = x.staff_id
                 WHERE x.token_hash = ?1 AND x.expires_at > ?2 AND s.is_active = 1"
              ),
              rusqlite::params![token_hash, now],
              RawStaff::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStaff::into_staff).transpose()
  }

  async fn delete_session(&self, token_hash: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![token_hash],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
