mod common;

use common::{fixture, new_user, sample_users, user_store};
use prefstore_core::{
    RecordKey, StoreError, TemperaturePreference, User, UserStore, UserUpdate, MAX_SAFE_ID,
};
use std::collections::HashSet;

#[test]
fn create_then_get_by_email_returns_input_plus_id() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let input = sample_users().remove(0);

    let created = store.create(&input).unwrap();
    assert!((0..=MAX_SAFE_ID).contains(&created.id));

    let loaded = store.get(&RecordKey::email("alice@example.com")).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "Alice Wonderland");
    assert_eq!(loaded.email, "alice@example.com");
    assert_eq!(
        loaded.preference_temperature,
        TemperaturePreference::GetsColdEasily
    );
    assert_eq!(loaded.google_oauth_token.as_deref(), Some("token_alice_123"));

    let by_id = store.get(&RecordKey::id(created.id)).unwrap();
    assert_eq!(by_id, created);
}

#[test]
fn create_with_existing_email_fails_and_keeps_original_row() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let original = store
        .create(&new_user(
            "Bob",
            "bob@example.com",
            TemperaturePreference::Neutral,
        ))
        .unwrap();

    let err = store
        .create(&new_user(
            "Impostor",
            "bob@example.com",
            TemperaturePreference::GetsHotEasily,
        ))
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    assert!(err.to_string().contains("users.email"));

    let loaded = store.get(&RecordKey::email("bob@example.com")).unwrap();
    assert_eq!(loaded, original);
    assert_eq!(store.get_all().unwrap().len(), 1);
}

#[test]
fn create_rejects_blank_name() {
    let (_dir, db) = fixture();
    let store = user_store(&db);

    let err = store
        .create(&new_user("  ", "blank@example.com", TemperaturePreference::Neutral))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn creating_many_users_yields_distinct_ids_and_get_all_matches_inputs() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let inputs = sample_users();

    let created: Vec<User> = inputs
        .iter()
        .map(|input| store.create(input).unwrap())
        .collect();

    let ids: HashSet<_> = created.iter().map(|user| user.id).collect();
    assert_eq!(ids.len(), inputs.len());

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), inputs.len());
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));

    let expected: HashSet<_> = inputs
        .iter()
        .map(|input| {
            (
                input.name.clone(),
                input.email.as_str().to_string(),
                input.preference_temperature,
                input.google_oauth_token.clone(),
            )
        })
        .collect();
    let actual: HashSet<_> = all
        .into_iter()
        .map(|user| {
            (
                user.name,
                user.email,
                user.preference_temperature,
                user.google_oauth_token,
            )
        })
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn exists_matches_email_or_id_and_is_false_without_key() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let alice = store.create(&sample_users().remove(0)).unwrap();

    assert!(store.exists(&RecordKey::email("alice@example.com")).unwrap());
    assert!(store.exists(&RecordKey::id(alice.id)).unwrap());
    assert!(!store.exists(&RecordKey::email("nobody@example.com")).unwrap());
    assert!(!store.exists(&RecordKey::none()).unwrap());

    let mixed = RecordKey {
        email: Some("nobody@example.com".to_string()),
        id: Some(alice.id),
    };
    assert!(store.exists(&mixed).unwrap());
}

#[test]
fn get_without_key_is_invalid_argument_and_unknown_key_is_not_found() {
    let (_dir, db) = fixture();
    let store = user_store(&db);

    let err = store.get(&RecordKey::none()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    let err = store.get(&RecordKey::email("ghost@example.com")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));

    let err = store.get(&RecordKey::id(42)).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn update_email_moves_lookup_to_new_address() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let ethan = store.create(&sample_users().remove(4)).unwrap();

    let updated = store
        .update(&UserUpdate::new(
            ethan.id,
            "Ethan Hunt",
            "ethan.hunt@example.com",
        ))
        .unwrap();
    assert_eq!(updated.id, ethan.id);
    assert_eq!(updated.email, "ethan.hunt@example.com");
    assert_eq!(updated.preference_temperature, ethan.preference_temperature);

    let loaded = store
        .get(&RecordKey::email("ethan.hunt@example.com"))
        .unwrap();
    assert_eq!(loaded, updated);

    let err = store.get(&RecordKey::email("ethan@example.com")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn update_keeping_own_email_is_allowed() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let bob = store.create(&sample_users().remove(1)).unwrap();

    let updated = store
        .update(&UserUpdate::new(bob.id, "Robert", "bob@example.com"))
        .unwrap();
    assert_eq!(updated.name, "Robert");
    assert_eq!(updated.email, "bob@example.com");
}

#[test]
fn update_to_another_users_email_is_rejected() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let users = sample_users();
    let alice = store.create(&users[0]).unwrap();
    let bob = store.create(&users[1]).unwrap();

    let err = store
        .update(&UserUpdate::new(bob.id, "Bob", "alice@example.com"))
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)));
    assert_eq!(err.to_string(), "Email address already exists!");

    assert_eq!(store.get(&RecordKey::email("bob@example.com")).unwrap(), bob);
    assert_eq!(
        store.get(&RecordKey::email("alice@example.com")).unwrap(),
        alice
    );
}

#[test]
fn update_reports_first_failing_rule() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let users = sample_users();
    store.create(&users[0]).unwrap();
    let bob = store.create(&users[1]).unwrap();

    let message = |email: &str| {
        store
            .update(&UserUpdate::new(bob.id, "Bob", email))
            .unwrap_err()
            .to_string()
    };

    assert_eq!(message("bob.example.com"), "Email address should contain @ character.");
    assert_eq!(message("bob@example"), "Email address should contain . character.");
    assert_eq!(
        message("bob smith@example.com"),
        "Email address should not contain any spaces."
    );
    // Missing `@` and contains a space: the `@` rule wins.
    assert_eq!(message("bob smith.com"), "Email address should contain @ character.");

    let err = store
        .update(&UserUpdate::new(bob.id, " ", "bob@example.com"))
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidArgument(_)));

    assert_eq!(store.get(&RecordKey::id(bob.id)).unwrap(), bob);
}

#[test]
fn update_unknown_id_is_not_found() {
    let (_dir, db) = fixture();
    let store = user_store(&db);

    let err = store
        .update(&UserUpdate::new(7, "Nobody", "not an email"))
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn update_writes_optional_fields_only_when_supplied() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let diana = store.create(&sample_users().remove(3)).unwrap();

    let updated = store
        .update(
            &UserUpdate::new(diana.id, "Diana", "diana@example.com")
                .with_preference(TemperaturePreference::GetsHotEasily),
        )
        .unwrap();
    assert_eq!(
        updated.preference_temperature,
        TemperaturePreference::GetsHotEasily
    );
    assert_eq!(updated.google_oauth_token.as_deref(), Some("token_diana_456"));

    let cleared = store
        .update(&UserUpdate::new(diana.id, "Diana", "diana@example.com").with_oauth_token(None))
        .unwrap();
    assert_eq!(cleared.google_oauth_token, None);
    assert_eq!(
        cleared.preference_temperature,
        TemperaturePreference::GetsHotEasily
    );
}

#[test]
fn update_preference_overwrites_enum_and_returns_refreshed_row() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let bob = store.create(&sample_users().remove(1)).unwrap();

    let updated = store
        .update_preference("bob@example.com", TemperaturePreference::GetsColdEasily)
        .unwrap();
    assert_eq!(updated.id, bob.id);
    assert_eq!(
        updated.preference_temperature,
        TemperaturePreference::GetsColdEasily
    );

    let err = store
        .update_preference("ghost@example.com", TemperaturePreference::Neutral)
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn remove_deletes_only_target_and_returns_snapshot() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let created: Vec<User> = sample_users()
        .iter()
        .map(|input| store.create(input).unwrap())
        .collect();
    let charlie = created
        .iter()
        .find(|user| user.email == "charlie@example.com")
        .unwrap()
        .clone();

    let removed = store.remove("charlie@example.com").unwrap();
    assert_eq!(removed, charlie);

    let remaining = store.get_all().unwrap();
    assert_eq!(remaining.len(), created.len() - 1);
    for user in created.iter().filter(|user| user.id != charlie.id) {
        assert!(remaining.contains(user));
    }

    let err = store.remove("charlie@example.com").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[test]
fn delete_by_id_reports_whether_a_row_matched() {
    let (_dir, db) = fixture();
    let store = user_store(&db);
    let alice = store.create(&sample_users().remove(0)).unwrap();

    assert!(store.delete_by_id(alice.id).unwrap());
    assert!(!store.delete_by_id(alice.id).unwrap());
    assert!(!store.exists(&RecordKey::id(alice.id)).unwrap());
}

#[test]
fn null_preference_row_reads_as_neutral_and_stays_removable() {
    let (_dir, db) = fixture();
    let conn = db.connect().unwrap();
    conn.execute(
        "INSERT INTO users (id, name, email, preference_temperature)
         VALUES (1, 'Legacy', 'legacy@example.com', NULL);",
        [],
    )
    .unwrap();
    drop(conn);
    let store = user_store(&db);
    let bob = store.create(&sample_users().remove(1)).unwrap();

    let all = store.get_all().unwrap();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&bob));

    let legacy = store.get(&RecordKey::id(1)).unwrap();
    assert_eq!(legacy.preference_temperature, TemperaturePreference::Neutral);

    let removed = store.remove("legacy@example.com").unwrap();
    assert_eq!(removed, legacy);
    assert_eq!(store.get_all().unwrap(), vec![bob]);
}
