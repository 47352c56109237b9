use lenders_core::{
    AdminRepository, BuyerRepository, Contact, Credentials, ErrorKind, FileAdminRepository,
    FileBuyerRepository, FileLenderRepository, FileUserRepository, LenderRepository, Portfolio,
    RepoError, UserRepository,
};
use tempfile::TempDir;

fn contact(first: &str, last: &str) -> Contact {
    Contact {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ssn: "123-45-6789".to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        phone_number: "555-0100".to_string(),
        business_name: format!("{last} Holdings"),
    }
}

fn user_repo(dir: &TempDir) -> FileUserRepository {
    FileUserRepository::open(dir.path().join("users.json")).unwrap()
}

#[test]
fn create_assigns_sequential_ids_and_get_roundtrip() {
    let dir = TempDir::new().unwrap();
    let repo = user_repo(&dir);

    let ada = repo
        .create_user(Credentials::new("ada", "pw1"), contact("Ada", "Lovelace"))
        .unwrap();
    let alan = repo
        .create_user(Credentials::new("alan", "pw2"), contact("Alan", "Turing"))
        .unwrap();

    assert_eq!(ada.id, 0);
    assert_eq!(alan.id, 1);
    assert_eq!(repo.get_user(alan.id).unwrap(), alan);
    assert!(repo.get_user(7).is_none());

    let listed: Vec<_> = repo.list_users().into_iter().map(|u| u.id).collect();
    assert_eq!(listed, vec![0, 1]);
}

#[test]
fn deleted_ids_are_not_reused() {
    let dir = TempDir::new().unwrap();
    let repo = user_repo(&dir);

    let first = repo
        .create_user(Credentials::new("a", "pw"), Contact::default())
        .unwrap();
    let second = repo
        .create_user(Credentials::new("b", "pw"), Contact::default())
        .unwrap();
    assert!(repo.delete_user(second.id).unwrap());
    assert!(!repo.delete_user(second.id).unwrap());

    let third = repo
        .create_user(Credentials::new("c", "pw"), Contact::default())
        .unwrap();
    assert!(third.id > second.id);
    assert!(repo.get_user(first.id).is_some());
    assert!(repo.get_user(second.id).is_none());
}

#[test]
fn reopen_yields_same_records_and_continues_sequence() {
    let dir = TempDir::new().unwrap();
    let before = {
        let repo = user_repo(&dir);
        for name in ["a", "b", "c"] {
            repo.create_user(Credentials::new(name, "pw"), contact(name, "X"))
                .unwrap();
        }
        repo.list_users()
    };

    let repo = user_repo(&dir);
    assert_eq!(repo.list_users(), before);
    let next = repo
        .create_user(Credentials::new("d", "pw"), Contact::default())
        .unwrap();
    assert_eq!(next.id, 3);
}

#[test]
fn field_updates_persist_and_report_not_found() {
    let dir = TempDir::new().unwrap();
    let repo = user_repo(&dir);
    let user = repo
        .create_user(Credentials::new("grace", "pw"), contact("Grace", "Hopper"))
        .unwrap();

    repo.update_name(user.id, "Grace B.", "Hopper").unwrap();
    repo.update_ssn(user.id, "000-00-0000").unwrap();
    repo.update_username(user.id, "amazing-grace").unwrap();

    let reopened = user_repo(&dir);
    let stored = reopened.get_user(user.id).unwrap();
    assert_eq!(stored.contact.first_name, "Grace B.");
    assert_eq!(stored.contact.ssn, "000-00-0000");
    assert_eq!(stored.credentials.username, "amazing-grace");
    assert_eq!(
        reopened
            .find_user_by_username("amazing-grace")
            .map(|u| u.id),
        Some(user.id)
    );

    let err = repo.update_ssn(42, "x").unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "user", id: 42 }));
}

#[test]
fn password_update_requires_current_password() {
    let dir = TempDir::new().unwrap();
    let repo = user_repo(&dir);
    let user = repo
        .create_user(Credentials::new("linus", "old"), Contact::default())
        .unwrap();

    let err = repo.update_password(user.id, "wrong-old", "new").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(repo.verify_password(user.id, "old").unwrap());
    assert_eq!(
        user_repo(&dir).get_user(user.id).unwrap().credentials.password,
        "old"
    );

    repo.update_password(user.id, "old", "new").unwrap();
    assert!(repo.verify_password(user.id, "new").unwrap());
    assert!(repo.authorize("linus", "new"));
    assert!(!repo.authorize("linus", "old"));

    let missing = repo.update_password(99, "old", "new").unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
    assert_eq!(
        repo.verify_password(99, "new").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn empty_password_is_rejected_as_conflict() {
    let dir = TempDir::new().unwrap();
    let repo = user_repo(&dir);
    let user = repo
        .create_user(Credentials::new("sam", "pw"), Contact::default())
        .unwrap();

    let err = repo.update_password(user.id, "pw", "").unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(repo.authorize("sam", "pw"));
}

#[test]
fn admin_contact_updates() {
    let dir = TempDir::new().unwrap();
    let repo = FileAdminRepository::open(dir.path().join("admins.json")).unwrap();

    let admin = repo
        .create_admin(Credentials::new("root", "pw"), "ops@example.com", "555-0199")
        .unwrap();
    repo.update_email(admin.id, "root@example.com").unwrap();
    let updated = repo.update_phone_number(admin.id, "555-0000").unwrap();

    assert_eq!(updated.email, "root@example.com");
    assert_eq!(updated.phone_number, "555-0000");
    assert!(repo.authorize("root", "pw"));
    assert_eq!(repo.list_admins().len(), 1);
    assert!(repo.delete_admin(admin.id).unwrap());
    assert!(repo.get_admin(admin.id).is_none());
}

#[test]
fn buyer_info_replacement_keeps_id() {
    let dir = TempDir::new().unwrap();
    let repo = FileBuyerRepository::open(dir.path().join("buyers.json")).unwrap();
    let buyer = repo
        .create_buyer(
            Credentials::new("flipper", "pw"),
            contact("Flip", "Per"),
            Portfolio {
                num_units: 3,
                num_deals_complete: 1,
                num_flips_complete: 0,
            },
        )
        .unwrap();

    let mut payload = buyer.clone();
    payload.id = 500;
    payload.portfolio.num_flips_complete = 2;
    let updated = repo.update_buyer(buyer.id, payload).unwrap();

    assert_eq!(updated.id, buyer.id);
    assert_eq!(repo.get_buyer(buyer.id).unwrap().portfolio.num_flips_complete, 2);
    assert!(repo.get_buyer(500).is_none());

    let err = repo.update_buyer(500, buyer).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn lender_password_gate_and_funds() {
    let dir = TempDir::new().unwrap();
    let repo = FileLenderRepository::open(dir.path().join("lenders.json")).unwrap();
    let lender = repo
        .create_lender(
            Credentials::new("fund", "pw"),
            contact("Fund", "Co"),
            250_000.0,
        )
        .unwrap();

    assert_eq!(
        repo.update_password(lender.id, "nope", "pw2")
            .unwrap_err()
            .kind(),
        ErrorKind::Conflict
    );
    repo.update_password(lender.id, "pw", "pw2").unwrap();
    assert!(repo.authorize("fund", "pw2"));

    let err = repo
        .create_lender(Credentials::new("neg", "pw"), Contact::default(), -5.0)
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.list_lenders().len(), 1);
    assert_eq!(
        repo.find_lender_by_username("fund").unwrap().funds_available,
        250_000.0
    );
}

#[test]
fn stores_of_different_types_keep_independent_sequences() {
    let dir = TempDir::new().unwrap();
    let users = user_repo(&dir);
    let buyers = FileBuyerRepository::open(dir.path().join("buyers.json")).unwrap();

    users
        .create_user(Credentials::new("u", "pw"), Contact::default())
        .unwrap();
    users
        .create_user(Credentials::new("v", "pw"), Contact::default())
        .unwrap();
    let buyer = buyers
        .create_buyer(
            Credentials::new("b", "pw"),
            Contact::default(),
            Portfolio::default(),
        )
        .unwrap();

    assert_eq!(buyer.id, 0);
}
