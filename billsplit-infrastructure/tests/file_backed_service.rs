use billsplit_application::{BillRepository, BillService, NewItem};
use billsplit_domain::{BillId, Money};
use billsplit_infrastructure::{
    CachedBillRepository, InMemoryBillRepository, JsonFileBillRepository, RandomIdGenerator,
};
use rstest::rstest;
use std::fs;

const LEGACY_DOCUMENT: &str = r##"{
    "id": "legacy",
    "name": "Beach house",
    "members": [
        { "id": "m1", "name": "Ann", "color": "#f87171", "paymentSlipUrl": "slips/ann.png", "paymentVerified": true },
        { "id": "m2", "name": "Ben", "color": "#fb923c" }
    ],
    "items": [
        { "id": "i1", "name": "Rent", "price": "2400", "paidBy": ["m1"], "sharedBy": ["m1", "m2"] }
    ]
}"##;

#[rstest]
fn bills_survive_a_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ids = RandomIdGenerator;

    let bill_id = {
        let repository = JsonFileBillRepository::new(dir.path());
        let service = BillService::new(&repository, &ids);
        let bill = service.create_bill("Dinner", &["Ann", "Ben"]).expect("create");
        let (ann, ben) = (bill.members[0].id.clone(), bill.members[1].id.clone());
        service
            .add_item(
                &bill.id,
                NewItem::new("Curry", Money::new(15050, 2))
                    .paid_by([ann.clone()])
                    .shared_by([ann, ben]),
            )
            .expect("add item");
        bill.id
    };

    let repository = JsonFileBillRepository::new(dir.path());
    let service = BillService::new(&repository, &ids);
    let report = service.settlement(&bill_id).expect("settlement");

    assert_eq!(report.total, Money::new(15050, 2));
    assert_eq!(report.transactions.len(), 1);
    assert_eq!(report.transactions[0].from_name, "Ben");
    assert_eq!(report.transactions[0].amount, Money::new(7525, 2));
}

#[rstest]
fn legacy_documents_are_upgraded_on_write() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("legacy.json");
    fs::write(&path, LEGACY_DOCUMENT).expect("write legacy");

    let repository = JsonFileBillRepository::new(dir.path());
    let ids = RandomIdGenerator;
    let service = BillService::new(&repository, &ids);
    let bill_id = BillId::new("legacy");

    let statement = service
        .member_statement(&bill_id, &"m2".into())
        .expect("statement");
    assert_eq!(statement.amount_to_pay(), Money::from_i64(1200));

    service
        .attach_payment_slip(&bill_id, &"m2".into(), "slips/ben.png")
        .expect("attach slip");

    let rewritten = fs::read_to_string(&path).expect("read back");
    assert!(!rewritten.contains("paymentSlipUrl"));
    let ann = service.member_statement(&bill_id, &"m1".into()).expect("ann");
    assert_eq!(ann.payment_slips, vec!["slips/ann.png".to_string()]);
    assert!(ann.payment_verified);
}

#[rstest]
fn cached_store_keeps_working_against_missing_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    // A regular file where the data directory should be makes every write fail.
    let blocked = dir.path().join("blocked");
    fs::write(&blocked, "").expect("create blocker");

    let repository = CachedBillRepository::new(
        JsonFileBillRepository::new(&blocked),
        InMemoryBillRepository::new(),
    );
    let ids = RandomIdGenerator;
    let service = BillService::new(&repository, &ids);

    let bill = service.create_bill("Offline", &["Ann"]).expect("create");
    let loaded = service.load_bill(&bill.id).expect("load from local copy");

    assert_eq!(loaded, bill);
}

#[rstest]
fn bill_created_offline_reaches_data_dir_once_it_is_writable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let data_dir = dir.path().join("data");
    let cache_dir = dir.path().join("cache");
    fs::write(&data_dir, "").expect("block data dir");

    let repository = CachedBillRepository::new(
        JsonFileBillRepository::new(&data_dir),
        JsonFileBillRepository::new(&cache_dir),
    )
    .with_journal(cache_dir.join(".pending.json"));
    let ids = RandomIdGenerator;
    let service = BillService::new(&repository, &ids);

    let bill = service.create_bill("Offline", &["Ann", "Ben"]).expect("create");
    service.rename_member(&bill.id, &bill.members[1].id, "Benny").expect("rename offline");
    assert!(!data_dir.is_dir());

    fs::remove_file(&data_dir).expect("unblock data dir");
    let loaded = service.load_bill(&bill.id).expect("load after reconnect");

    assert_eq!(loaded.members[1].name, "Benny");
    let synced = JsonFileBillRepository::new(&data_dir)
        .load(&bill.id)
        .expect("synced to data dir");
    assert_eq!(synced, loaded);
}
