use lenders_core::{
    Contact, Credentials, ErrorKind, ExitStrategy, HouseCondition, HouseDetails, HouseRepository,
    InvestmentRepository, LenderRepository, RepoError, StoreConfig, Stores, UserRepository,
    UnitType,
};
use tempfile::TempDir;

fn details() -> HouseDetails {
    HouseDetails {
        address: "8 Harbor Way".to_string(),
        zipcode: 2110,
        city: "Boston".to_string(),
        sqft: 2_400,
        condition: HouseCondition::Good,
        unit_type: UnitType::SingleResidential,
        loan_amount: 520_000.0,
        ltv_percent: 65.0,
        rehab_cost: 15_000.0,
        rehab_loan: 0.0,
        rehab_overview: String::new(),
        gross_rent_estimate: 3_900.0,
        closed_on: true,
        closing_date: Some("2024-04-18".to_string()),
        turn_around_date: None,
        exit_strategy: ExitStrategy::FixAndRent,
    }
}

fn open(dir: &TempDir) -> Stores {
    Stores::open(&StoreConfig::from_data_dir(dir.path())).unwrap()
}

#[test]
fn invest_requires_known_lender_and_accepted_house() {
    let dir = TempDir::new().unwrap();
    let stores = open(&dir);
    let lender = stores
        .lenders
        .create_lender(Credentials::new("fund", "pw"), Contact::default(), 1e6)
        .unwrap();
    let application = stores.houses.create_application(details()).unwrap();
    let service = stores.investment_service();

    let err = service
        .invest(lender.id, application.id, "2024-05-01", 10_000.0)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "house", .. }));

    let house = stores
        .houses
        .accept_application(application.id, 9.0)
        .unwrap();
    let err = service
        .invest(lender.id + 1, house.id, "2024-05-01", 10_000.0)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "lender", .. }));
    assert!(stores.investments.is_empty());

    let investment = service
        .invest(lender.id, house.id, "2024-05-01", 10_000.0)
        .unwrap();
    assert_eq!(investment.investor_id, lender.id);
    assert_eq!(service.portfolio(lender.id).unwrap(), vec![investment.clone()]);
    assert_eq!(service.backers(house.id).unwrap(), vec![investment.clone()]);

    assert!(service.withdraw(investment.id).unwrap());
    assert!(service.portfolio(lender.id).unwrap().is_empty());
    assert_eq!(
        service.portfolio(lender.id + 1).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn referenced_lender_and_house_cannot_be_deleted_through_the_service() {
    let dir = TempDir::new().unwrap();
    let stores = open(&dir);
    let lender = stores
        .lenders
        .create_lender(Credentials::new("fund", "pw"), Contact::default(), 1e6)
        .unwrap();
    let house = stores.houses.create_house(details(), 8.5).unwrap();
    let service = stores.investment_service();
    let investment = service
        .invest(lender.id, house.id, "2024-05-02", 25_000.0)
        .unwrap();

    let err = service.delete_lender(lender.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let err = service.delete_house(house.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(stores.lenders.get_lender(lender.id).is_some());
    assert!(stores.houses.get_house(house.id).is_some());
    assert_eq!(service.backers(house.id).unwrap(), vec![investment.clone()]);

    assert!(service.withdraw(investment.id).unwrap());
    assert!(service.delete_house(house.id).unwrap());
    assert!(service.delete_lender(lender.id).unwrap());
    assert!(!service.delete_lender(lender.id).unwrap());
    assert!(stores.houses.get_house(house.id).is_none());
}

#[test]
fn stores_reopen_from_data_dir() {
    let dir = TempDir::new().unwrap();
    {
        let stores = open(&dir);
        stores
            .users
            .create_user(Credentials::new("u", "pw"), Contact::default())
            .unwrap();
        let lender = stores
            .lenders
            .create_lender(Credentials::new("l", "pw"), Contact::default(), 10.0)
            .unwrap();
        let house = stores.houses.create_house(details(), 4.0).unwrap();
        stores.houses.create_application(details()).unwrap();
        stores
            .investment_service()
            .invest(lender.id, house.id, "2024-05-02", 5.0)
            .unwrap();
    }

    let stores = open(&dir);
    let counts = stores.counts();
    assert_eq!(counts.users, 1);
    assert_eq!(counts.lenders, 1);
    assert_eq!(counts.houses, 1);
    assert_eq!(counts.house_applications, 1);
    assert_eq!(counts.investments, 1);
    assert_eq!(counts.admins, 0);
    assert_eq!(stores.investments.list_by_investor(0).len(), 1);
    assert!(stores.users.authorize("u", "pw"));
}

#[test]
fn malformed_backing_file_fails_to_open() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("buyers.json"), "not json").unwrap();

    let err = Stores::open(&StoreConfig::from_data_dir(dir.path()))
        .err()
        .unwrap();
    assert!(err.path().ends_with("buyers.json"));
}
