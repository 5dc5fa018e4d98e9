//! Generic storage for owner-keyed resume collections.
//!
//! Each collection maps to one table with the same four leading columns
//! (`id, owner_id, created_at, updated_at`) followed by its own text
//! columns. [`ItemTable`] describes the trailing columns; the single
//! [`OwnedStore`] impl below serves every type that implements it.

use chrono::Utc;
use uuid::Uuid;
use vitae_core::{
  item::{Certificate, Education, Experience, Owned, ResumeItem, Skill},
  store::OwnedStore,
};

use crate::{
  Error, Result, SqliteStore,
  encode::{decode_date, decode_dt, decode_uuid, encode_date, encode_dt, encode_uuid},
};

// ─── Table description ───────────────────────────────────────────────────────

/// How a [`ResumeItem`] is laid out in its table.
pub trait ItemTable: ResumeItem {
  const TABLE: &'static str;

  /// Item columns, in the order produced by [`Self::encode`].
  const COLUMNS: &'static [&'static str];

  fn encode(&self) -> Vec<Option<String>>;

  fn decode(columns: &mut Columns) -> Result<Self>;
}

/// A cursor over the item columns of one row.
pub struct Columns {
  table:  &'static str,
  values: std::vec::IntoIter<Option<String>>,
}

impl Columns {
  fn new(table: &'static str, values: Vec<Option<String>>) -> Self {
    Self { table, values: values.into_iter() }
  }

  pub fn optional_text(&mut self) -> Option<String> { self.values.next().flatten() }

  pub fn text(&mut self) -> Result<String> {
    self.optional_text().ok_or_else(|| Error::MalformedRow {
      table:  self.table,
      reason: "unexpected NULL".to_owned(),
    })
  }

  pub fn date(&mut self) -> Result<chrono::NaiveDate> { decode_date(&self.text()?) }

  pub fn optional_date(&mut self) -> Result<Option<chrono::NaiveDate>> {
    self.optional_text().as_deref().map(decode_date).transpose()
  }
}

impl ItemTable for Skill {
  const TABLE: &'static str = "skills";
  const COLUMNS: &'static [&'static str] = &["title"];

  fn encode(&self) -> Vec<Option<String>> { vec![Some(self.title.clone())] }

  fn decode(c: &mut Columns) -> Result<Self> { Ok(Self { title: c.text()? }) }
}

impl ItemTable for Education {
  const TABLE: &'static str = "educations";
  const COLUMNS: &'static [&'static str] =
    &["institution", "degree", "start_date", "end_date"];

  fn encode(&self) -> Vec<Option<String>> {
    vec![
      Some(self.institution.clone()),
      Some(self.degree.clone()),
      Some(encode_date(self.start_date)),
      self.end_date.map(encode_date),
    ]
  }

  fn decode(c: &mut Columns) -> Result<Self> {
    Ok(Self {
      institution: c.text()?,
      degree:      c.text()?,
      start_date:  c.date()?,
      end_date:    c.optional_date()?,
    })
  }
}

impl ItemTable for Certificate {
  const TABLE: &'static str = "certificates";
  const COLUMNS: &'static [&'static str] =
    &["title", "issuing_organization", "issue_date"];

  fn encode(&self) -> Vec<Option<String>> {
    vec![
      Some(self.title.clone()),
      Some(self.issuing_organization.clone()),
      Some(encode_date(self.issue_date)),
    ]
  }

  fn decode(c: &mut Columns) -> Result<Self> {
    Ok(Self {
      title:                c.text()?,
      issuing_organization: c.text()?,
      issue_date:           c.date()?,
    })
  }
}

impl ItemTable for Experience {
  const TABLE: &'static str = "experiences";
  const COLUMNS: &'static [&'static str] =
    &["company", "position", "description", "start_date", "end_date"];

  fn encode(&self) -> Vec<Option<String>> {
    vec![
      Some(self.company.clone()),
      Some(self.position.clone()),
      self.description.clone(),
      Some(encode_date(self.start_date)),
      self.end_date.map(encode_date),
    ]
  }

  fn decode(c: &mut Columns) -> Result<Self> {
    Ok(Self {
      company:     c.text()?,
      position:    c.text()?,
      description: c.optional_text(),
      start_date:  c.date()?,
      end_date:    c.optional_date()?,
    })
  }
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read from any item table.
struct RawRecord {
  id:         String,
  owner_id:   String,
  created_at: String,
  updated_at: String,
  fields:     Vec<Option<String>>,
}

impl RawRecord {
  fn read(row: &rusqlite::Row<'_>, width: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      owner_id:   row.get(1)?,
      created_at: row.get(2)?,
      updated_at: row.get(3)?,
      fields:     (4..4 + width)
        .map(|i| row.get(i))
        .collect::<rusqlite::Result<_>>()?,
    })
  }

  fn into_owned<T: ItemTable>(self) -> Result<Owned<T>> {
    let mut columns = Columns::new(T::TABLE, self.fields);
    Ok(Owned {
      id:         decode_uuid(&self.id)?,
      owner_id:   decode_uuid(&self.owner_id)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      item:       T::decode(&mut columns)?,
    })
  }
}

// ─── SQL builders ────────────────────────────────────────────────────────────

fn select_sql<T: ItemTable>(filter: &str) -> String {
  format!(
    "SELECT id, owner_id, created_at, updated_at, {} FROM {} WHERE {filter}",
    T::COLUMNS.join(", "),
    T::TABLE,
  )
}

fn insert_sql<T: ItemTable>() -> String {
  let placeholders: Vec<String> =
    (1..=4 + T::COLUMNS.len()).map(|i| format!("?{i}")).collect();
  format!(
    "INSERT INTO {} (id, owner_id, created_at, updated_at, {}) VALUES ({})",
    T::TABLE,
    T::COLUMNS.join(", "),
    placeholders.join(", "),
  )
}

/// `?1` = id, `?2` = owner, `?3` = updated_at, then the item columns.
fn update_sql<T: ItemTable>() -> String {
  let assignments: Vec<String> = T::COLUMNS
    .iter()
    .enumerate()
    .map(|(i, col)| format!("{col} = ?{}", i + 4))
    .collect();
  format!(
    "UPDATE {} SET updated_at = ?3, {} WHERE id = ?1 AND owner_id = ?2",
    T::TABLE,
    assignments.join(", "),
  )
}

// ─── OwnedStore impl ─────────────────────────────────────────────────────────

impl<T: ItemTable> OwnedStore<T> for SqliteStore {
  async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Owned<T>>> {
    let owner_str = encode_uuid(owner_id);
    let sql       = format!("{} ORDER BY created_at, rowid", select_sql::<T>("owner_id = ?1"));
    let width     = T::COLUMNS.len();

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| RawRecord::read(row, width))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_owned).collect()
  }

  async fn get_owned(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Owned<T>>> {
    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(owner_id);
    let sql       = select_sql::<T>("id = ?1 AND owner_id = ?2");
    let width     = T::COLUMNS.len();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        use rusqlite::OptionalExtension as _;
        Ok(conn
          .query_row(&sql, rusqlite::params![id_str, owner_str], |row| {
            RawRecord::read(row, width)
          })
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_owned).transpose()
  }

  async fn insert_owned(&self, owner_id: Uuid, item: T) -> Result<Owned<T>> {
    let now   = Utc::now();
    let owned = Owned { id: Uuid::new_v4(), owner_id, created_at: now, updated_at: now, item };

    let mut values = vec![
      Some(encode_uuid(owned.id)),
      Some(encode_uuid(owned.owner_id)),
      Some(encode_dt(owned.created_at)),
      Some(encode_dt(owned.updated_at)),
    ];
    values.extend(owned.item.encode());
    let sql = insert_sql::<T>();

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(())
      })
      .await?;

    Ok(owned)
  }

  async fn update_owned(
    &self,
    owner_id: Uuid,
    id: Uuid,
    item: T,
  ) -> Result<Option<Owned<T>>> {
    let mut values = vec![
      Some(encode_uuid(id)),
      Some(encode_uuid(owner_id)),
      Some(encode_dt(Utc::now())),
    ];
    values.extend(item.encode());
    let update = update_sql::<T>();
    let select = select_sql::<T>("id = ?1 AND owner_id = ?2");
    let key    = [encode_uuid(id), encode_uuid(owner_id)];
    let width  = T::COLUMNS.len();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if tx.execute(&update, rusqlite::params_from_iter(values))? == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(&select, rusqlite::params_from_iter(key), |row| {
          RawRecord::read(row, width)
        })?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw.map(RawRecord::into_owned).transpose()
  }

  async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> Result<bool> {
    let id_str    = encode_uuid(id);
    let owner_str = encode_uuid(owner_id);
    let sql       = format!("DELETE FROM {} WHERE id = ?1 AND owner_id = ?2", T::TABLE);

    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id_str, owner_str])?))
      .await?;

    Ok(deleted > 0)
  }
}
