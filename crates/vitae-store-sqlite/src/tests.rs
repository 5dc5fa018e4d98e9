//! Integration tests for `SqliteStore` against an in-memory database.

use vitae_core::{
  Error as CoreError,
  accounts::{self, Login, Registration},
  aggregate,
  identity::NewIdentity,
  item::{Education, EducationPatch, Experience, Skill, SkillPatch},
  profile::{ProfileFields, ProfilePatch},
  scoped::{self, UpdateMode},
  store::{AccountStore, OwnedStore},
  validation::DATE_ORDER,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(s: &str) -> chrono::NaiveDate { s.parse().unwrap() }

fn new_user(email: &str) -> NewIdentity {
  NewIdentity::user(email.to_owned(), "$argon2id$placeholder".to_owned())
}

async fn owner(s: &SqliteStore, email: &str) -> Uuid {
  s.create_identity(new_user(email)).await.unwrap().unwrap().id
}

fn skill(title: &str) -> Skill { Skill { title: title.to_owned() } }

// ─── Identities ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_identity_also_creates_empty_profile() {
  let s = store().await;
  let identity = s
    .create_identity(new_user("test@example.com"))
    .await
    .unwrap()
    .expect("fresh email");
  assert!(identity.is_active);
  assert!(!identity.is_staff);

  let profile = s.get_profile(identity.id).await.unwrap().expect("profile row");
  assert_eq!(profile.owner_id, identity.id);
  assert_eq!(profile.fields(), ProfileFields::default());
}

#[tokio::test]
async fn duplicate_email_writes_nothing() {
  let s = store().await;
  let first = owner(&s, "test@example.com").await;

  let second = s.create_identity(new_user("test@example.com")).await.unwrap();
  assert!(second.is_none());

  let found = s
    .find_identity_by_email("test@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.id, first);

  let orphans: i64 = s
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM profiles WHERE owner_id NOT IN \
         (SELECT identity_id FROM identities)",
        [],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(orphans, 0);

  let profiles: i64 = s
    .conn
    .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?))
    .await
    .unwrap();
  assert_eq!(profiles, 1);
}

#[tokio::test]
async fn superuser_flags_round_trip() {
  let s = store().await;
  let admin = s
    .create_identity(NewIdentity::superuser("admin@example.com".into(), "hash".into()))
    .await
    .unwrap()
    .unwrap();

  let found = s
    .find_identity_by_email("admin@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.id, admin.id);
  assert!(found.is_staff);
  assert!(found.is_superuser);
}

#[tokio::test]
async fn token_digest_resolves_to_owner() {
  let s = store().await;
  let id = owner(&s, "test@example.com").await;

  s.insert_token("abc123".into(), id).await.unwrap();
  let resolved = s.identity_for_token("abc123".into()).await.unwrap().unwrap();
  assert_eq!(resolved.id, id);

  assert!(s.identity_for_token("nope".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn update_profile_overwrites_fields() {
  let s = store().await;
  let id = owner(&s, "test@example.com").await;

  let fields = ProfileFields {
    first_name: Some("Ada".into()),
    last_name:  None,
    about_me:   Some("Analyst".into()),
  };
  let updated = s.update_profile(id, fields.clone()).await.unwrap().unwrap();
  assert_eq!(updated.fields(), fields);
  assert!(updated.updated_at >= updated.created_at);

  assert!(s.update_profile(Uuid::new_v4(), fields).await.unwrap().is_none());
}

// ─── Owned collections ───────────────────────────────────────────────────────

#[tokio::test]
async fn list_is_scoped_to_owner_and_ordered() {
  let s = store().await;
  let alice = owner(&s, "alice@example.com").await;
  let bob = owner(&s, "bob@example.com").await;

  s.insert_owned(alice, skill("Python")).await.unwrap();
  s.insert_owned(alice, skill("Django")).await.unwrap();
  s.insert_owned(bob, skill("Rust")).await.unwrap();

  let mine = OwnedStore::<Skill>::list_owned(&s, alice).await.unwrap();
  let titles: Vec<_> = mine.iter().map(|o| o.item.title.as_str()).collect();
  assert_eq!(titles, ["Python", "Django"]);
  assert!(mine.iter().all(|o| o.owner_id == alice));

  let theirs = OwnedStore::<Skill>::list_owned(&s, bob).await.unwrap();
  assert_eq!(theirs.len(), 1);
  assert!(OwnedStore::<Education>::list_owned(&s, bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn foreign_records_are_invisible() {
  let s = store().await;
  let alice = owner(&s, "alice@example.com").await;
  let bob = owner(&s, "bob@example.com").await;
  let record = s.insert_owned(alice, skill("Python")).await.unwrap();

  assert!(OwnedStore::<Skill>::get_owned(&s, bob, record.id).await.unwrap().is_none());
  assert!(s.update_owned(bob, record.id, skill("Hijacked")).await.unwrap().is_none());
  assert!(!OwnedStore::<Skill>::delete_owned(&s, bob, record.id).await.unwrap());

  let still = OwnedStore::<Skill>::get_owned(&s, alice, record.id)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(still.item.title, "Python");
}

#[tokio::test]
async fn update_replaces_fields_and_bumps_timestamp() {
  let s = store().await;
  let id = owner(&s, "test@example.com").await;
  let record = s
    .insert_owned(id, Experience {
      company:     "Tech Group".into(),
      position:    "Software Engineer".into(),
      description: Some("Worked on developing applications.".into()),
      start_date:  date("2022-04-12"),
      end_date:    Some(date("2023-05-06")),
    })
    .await
    .unwrap();

  let replacement = Experience {
    company:     "Sky Group".into(),
    position:    "Python Developer".into(),
    description: None,
    start_date:  date("2023-02-01"),
    end_date:    None,
  };
  let updated = s
    .update_owned(id, record.id, replacement.clone())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.id, record.id);
  assert_eq!(updated.item, replacement);
  assert_eq!(updated.created_at, record.created_at);
  assert!(updated.updated_at >= record.updated_at);
}

#[tokio::test]
async fn delete_removes_record() {
  let s = store().await;
  let id = owner(&s, "test@example.com").await;
  let record = s.insert_owned(id, skill("Python")).await.unwrap();

  assert!(OwnedStore::<Skill>::delete_owned(&s, id, record.id).await.unwrap());
  assert!(OwnedStore::<Skill>::get_owned(&s, id, record.id).await.unwrap().is_none());
  assert!(!OwnedStore::<Skill>::delete_owned(&s, id, record.id).await.unwrap());
}

#[tokio::test]
async fn schema_rejects_reversed_dates() {
  let s = store().await;
  let id = owner(&s, "test@example.com").await;
  let result = s
    .insert_owned(id, Education {
      institution: "Tech Uni".into(),
      degree:      "Bachelor".into(),
      start_date:  date("2023-04-12"),
      end_date:    Some(date("2022-05-06")),
    })
    .await;
  assert!(result.is_err());
}

#[tokio::test]
async fn boundary_dates_round_trip() {
  let s = store().await;
  let id = owner(&s, "test@example.com").await;
  let education = Education {
    institution: "Tech Uni".into(),
    degree:      "Bachelor".into(),
    start_date:  date("0001-01-01"),
    end_date:    Some(date("9999-12-31")),
  };
  let record = s.insert_owned(id, education.clone()).await.unwrap();

  let listed = OwnedStore::<Education>::list_owned(&s, id).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, record.id);
  assert_eq!(listed[0].item, education);
}

// ─── Use cases over SQLite ───────────────────────────────────────────────────

fn registration(email: &str, password: &str, password1: &str) -> Registration {
  Registration {
    email:     Some(email.into()),
    password:  Some(password.into()),
    password1: Some(password1.into()),
  }
}

fn credentials(email: &str, password: &str) -> Login {
  Login { email: Some(email.into()), password: Some(password.into()) }
}

#[tokio::test]
async fn register_login_authenticate() {
  let s = store().await;
  let identity = accounts::register(
    &s,
    registration("test@example.com", "testpass123", "testpass123"),
  )
  .await
  .unwrap();

  let token = accounts::login(&s, credentials("test@example.com", "testpass123"))
    .await
    .unwrap();
  let caller = accounts::authenticate(&s, &token).await.unwrap();
  assert_eq!(caller.id(), identity.id);
  assert_eq!(caller.email(), "test@example.com");

  let again = accounts::login(&s, credentials("test@example.com", "testpass123"))
    .await
    .unwrap();
  assert_ne!(token, again);
  assert!(accounts::authenticate(&s, &token).await.is_ok());
}

#[tokio::test]
async fn register_rejects_duplicate_and_mismatch() {
  let s = store().await;
  accounts::register(&s, registration("test@example.com", "testpass123", "testpass123"))
    .await
    .unwrap();

  let Err(CoreError::Validation(errors)) = accounts::register(
    &s,
    registration("test@EXAMPLE.com", "testpass123", "testpass123"),
  )
  .await
  else {
    panic!("duplicate email accepted");
  };
  assert!(errors.contains("email"));

  let Err(CoreError::Validation(errors)) = accounts::register(
    &s,
    registration("other@example.com", "testpass123", "badpass123"),
  )
  .await
  else {
    panic!("mismatched passwords accepted");
  };
  assert_eq!(errors.messages("detail"), ["passwords do not match"]);
  assert!(
    s.find_identity_by_email("other@example.com".into())
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn registration_trims_passwords() {
  let s = store().await;
  let Err(CoreError::Validation(errors)) =
    accounts::register(&s, registration("blank@example.com", "      ", "      ")).await
  else {
    panic!("whitespace password accepted");
  };
  assert!(errors.contains("password"));
  assert!(errors.contains("password1"));

  accounts::register(&s, registration("test@example.com", " testpass123 ", "testpass123"))
    .await
    .unwrap();
  assert!(
    accounts::login(&s, credentials("test@example.com", "testpass123"))
      .await
      .is_ok()
  );
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
  let s = store().await;
  accounts::register(&s, registration("test@example.com", "testpass123", "testpass123"))
    .await
    .unwrap();

  for login in [
    credentials("test@example.com", "badpass123"),
    credentials("nobody@example.com", "testpass123"),
  ] {
    assert!(matches!(
      accounts::login(&s, login).await,
      Err(CoreError::InvalidCredentials)
    ));
  }
  assert!(matches!(
    accounts::authenticate(&s, "not-a-token").await,
    Err(CoreError::Unauthorized)
  ));
}

#[tokio::test]
async fn scoped_update_modes() {
  let s = store().await;
  accounts::register(&s, registration("test@example.com", "testpass123", "testpass123"))
    .await
    .unwrap();
  let token = accounts::login(&s, credentials("test@example.com", "testpass123"))
    .await
    .unwrap();
  let caller = accounts::authenticate(&s, &token).await.unwrap();

  let created = scoped::create::<Education, _>(&s, &caller, EducationPatch {
    institution: Some("Tech Uni".into()),
    degree:      Some("Bachelor".into()),
    start_date:  Some(date("2020-01-01")),
    end_date:    Some(Some(date("2023-01-01"))),
  })
  .await
  .unwrap();

  // Merge keeps the stored end date, so a later start is rejected.
  let Err(CoreError::Validation(errors)) = scoped::update::<Education, _>(
    &s,
    &caller,
    created.id,
    EducationPatch { start_date: Some(date("2024-01-01")), ..Default::default() },
    UpdateMode::Merge,
  )
  .await
  else {
    panic!("reversed range accepted");
  };
  assert_eq!(errors.messages("end_date"), [DATE_ORDER]);

  // Replace requires every field.
  let Err(CoreError::Validation(errors)) = scoped::update::<Education, _>(
    &s,
    &caller,
    created.id,
    EducationPatch { degree: Some("Master".into()), ..Default::default() },
    UpdateMode::Replace,
  )
  .await
  else {
    panic!("partial replace accepted");
  };
  assert!(errors.contains("institution"));

  let merged = scoped::update::<Education, _>(
    &s,
    &caller,
    created.id,
    EducationPatch { degree: Some("Master".into()), ..Default::default() },
    UpdateMode::Merge,
  )
  .await
  .unwrap();
  assert_eq!(merged.item.degree, "Master");
  assert_eq!(merged.item.institution, "Tech Uni");
}

#[tokio::test]
async fn aggregate_contains_only_callers_records() {
  let s = store().await;
  for email in ["alice@example.com", "bob@example.com"] {
    accounts::register(&s, registration(email, "testpass123", "testpass123"))
      .await
      .unwrap();
  }
  let alice = accounts::authenticate(
    &s,
    &accounts::login(&s, credentials("alice@example.com", "testpass123"))
      .await
      .unwrap(),
  )
  .await
  .unwrap();
  let bob = accounts::authenticate(
    &s,
    &accounts::login(&s, credentials("bob@example.com", "testpass123"))
      .await
      .unwrap(),
  )
  .await
  .unwrap();

  scoped::create::<Skill, _>(&s, &alice, SkillPatch { title: Some("Python".into()) })
    .await
    .unwrap();
  scoped::create::<Skill, _>(&s, &bob, SkillPatch { title: Some("Rust".into()) })
    .await
    .unwrap();
  accounts::update_profile(&s, &alice, ProfilePatch {
    first_name: Some(Some("Alice".into())),
    ..Default::default()
  })
  .await
  .unwrap();

  let view = aggregate::assemble(&s, &alice).await.unwrap();
  assert_eq!(view.email, "alice@example.com");
  assert_eq!(view.profile.first_name.as_deref(), Some("Alice"));
  assert_eq!(view.skills.len(), 1);
  assert_eq!(view.skills[0].item.title, "Python");
  assert!(view.educations.is_empty());
  assert!(view.certificates.is_empty());
  assert!(view.experiences.is_empty());
}
