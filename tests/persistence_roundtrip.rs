// Declaro — Persistence round-trip tests
//
// Both repositories over one SQLite file: state written by one `App` must be
// exactly what the next `App` opened on the same file sees.

use std::sync::Arc;
use std::time::Duration;

use declaro::app::App;
use declaro::auth::{AuthError, CredentialHasher, ProfileUpdate};
use declaro::kv::{Database, KvStore, SqliteKvStore};
use declaro::store::{
    BeneficialOwner, DeclarationFields, DeclarationPatch, DeclarationStore, PurposeOfTransaction,
    SourceOfFund, StoreError, TransactionVolume, FALLBACK_USER_ID,
};

fn cheap_hasher() -> CredentialHasher {
    CredentialHasher::new(argon2::Params::MIN_M_COST, 1).unwrap()
}

fn open_app(path: &std::path::Path) -> App {
    let db = Database::open(path).unwrap();
    let kv: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(Arc::new(db)));
    App::with_kv(kv, cheap_hasher(), Duration::ZERO).unwrap()
}

fn fields(name: &str, transaction_no: &str) -> DeclarationFields {
    DeclarationFields {
        transaction_volume: TransactionVolume::Above,
        transaction_no: transaction_no.to_string(),
        transaction_date: "2024-06-12".to_string(),
        id_no: "G7654321N".to_string(),
        name: name.to_string(),
        nationality: "Malaysian".to_string(),
        address: "21 Jalan Besar".to_string(),
        dob: "1975-11-03".to_string(),
        phone_no: "+60 12 345 6789".to_string(),
        source_of_fund: SourceOfFund::Others,
        source_of_fund_others: Some("Lottery".to_string()),
        purpose_of_transaction: PurposeOfTransaction::Business,
        purpose_of_transaction_others: None,
        beneficial_owner: BeneficialOwner::Shares,
        beneficial_owner_share: Some("40".to_string()),
        cross_border_movement: true,
        compliance_mas: false,
        compliance_pep: false,
        compliance_tax_evasion: false,
    }
}

#[tokio::test]
async fn test_declarations_and_session_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("declaro.db");

    let app = open_app(&path);
    let demo = app.session.login("demo", "demo123").await.unwrap();
    app.declarations.create(fields("Lim", "TX-1")).unwrap();
    app.declarations.create(fields("Kumar", "TX-2")).unwrap();
    let last = app.declarations.create(fields("Wong", "TX-3")).unwrap();

    let before = app.declarations.all();
    drop(app);

    let app = open_app(&path);
    assert_eq!(app.declarations.all(), before);
    assert_eq!(app.declarations.current(), Some(last));
    assert_eq!(app.session.current_user(), Some(demo));
    assert!(app.declarations.visible().is_empty());
}

#[tokio::test]
async fn test_registered_user_and_password_change_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("declaro.db");

    let app = open_app(&path);
    app.session.register("siti", "abc").await.unwrap();
    app.session.change_password("abc", "xyz").await.unwrap();
    app.session.logout();
    drop(app);

    let app = open_app(&path);
    let err = app.session.login("siti", "abc").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let user = app.session.login("SITI", "xyz").await.unwrap();
    assert_eq!(user.username, "siti");
    assert_eq!(user.store_name, "My Store");
}

#[tokio::test]
async fn test_records_are_scoped_to_their_owner() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(&dir.path().join("declaro.db"));

    app.session.login("demo", "demo123").await.unwrap();
    let mine = app.declarations.create(fields("Lim", "TX-1")).unwrap();

    app.session.register("ahmad", "pw1").await.unwrap();
    let theirs = app.declarations.create(fields("Kumar", "TX-2")).unwrap();
    assert_ne!(theirs.user_id, mine.user_id);

    assert_eq!(app.declarations.list_for_current_user().unwrap(), vec![theirs.clone()]);

    app.session.login("demo", "demo123").await.unwrap();
    assert_eq!(app.declarations.list_for_current_user().unwrap(), vec![mine.clone()]);
    assert_eq!(app.declarations.all(), vec![mine, theirs]);
}

#[tokio::test]
async fn test_logged_out_behaviour() {
    let dir = tempfile::tempdir().unwrap();
    let app = open_app(&dir.path().join("declaro.db"));

    let orphan = app.declarations.create(fields("Lim", "TX-1")).unwrap();
    assert_eq!(orphan.user_id, FALLBACK_USER_ID);

    let err = app.declarations.list_for_current_user().unwrap_err();
    assert!(matches!(err, StoreError::Unauthenticated));

    assert!(app.declarations.delete("missing").unwrap().is_empty());
    assert_eq!(app.declarations.all(), vec![orphan.clone()]);

    // Records made while logged out are not attributed to the demo account
    app.session.login("demo", "demo123").await.unwrap();
    assert!(app.declarations.list_for_current_user().unwrap().is_empty());
    assert!(app.declarations.delete(&orphan.id).unwrap().is_empty());
    assert!(app.declarations.all().is_empty());
    app.session.logout();

    assert!(app
        .session
        .update_profile(&ProfileUpdate {
            store_name: Some("Nobody".to_string()),
            ..Default::default()
        })
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_persists_and_keeps_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("declaro.db");

    let app = open_app(&path);
    app.session.login("demo", "demo123").await.unwrap();
    let created = app.declarations.create(fields("Lim", "TX-1")).unwrap();

    let patch = DeclarationPatch {
        compliance_pep: Some(true),
        ..Default::default()
    };
    app.declarations.update(&created.id, &patch).unwrap();
    drop(app);

    let app = open_app(&path);
    let reloaded = app.declarations.get_by_id(&created.id).unwrap();
    assert!(reloaded.fields.compliance_pep);
    assert_eq!(reloaded.id, created.id);
    assert_eq!(reloaded.user_id, created.user_id);
    assert_eq!(reloaded.created_at, created.created_at);
}
