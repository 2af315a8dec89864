use vetdb_core::{Customer, CustomerDetails, CustomerField, CustomerPatch};

#[test]
fn customer_serializes_as_flat_record() {
    let customer = Customer::new(
        3,
        CustomerDetails {
            fname: "John".to_string(),
            lname: "Doe".to_string(),
            phone: "5551234567".to_string(),
            email: "john@doe.com".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            postalcode: "A1A1A1".to_string(),
        },
    );

    let json = serde_json::to_value(&customer).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["fname"], "John");
    assert_eq!(json["postalcode"], "A1A1A1");
    assert!(json.get("details").is_none());

    let decoded: Customer = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, customer);
}

#[test]
fn values_follow_column_order() {
    let details = CustomerDetails {
        fname: "a".to_string(),
        lname: "b".to_string(),
        phone: "c".to_string(),
        email: "d".to_string(),
        address: "e".to_string(),
        city: "f".to_string(),
        postalcode: "g".to_string(),
    };

    assert_eq!(details.values(), ["a", "b", "c", "d", "e", "f", "g"]);
    let columns: Vec<_> = CustomerField::ALL.iter().map(|field| field.column()).collect();
    assert_eq!(
        columns,
        vec!["fname", "lname", "phone", "email", "address", "city", "postalcode"]
    );
}

#[test]
fn trimmed_strips_surrounding_whitespace_only() {
    let details = CustomerDetails {
        fname: "  Mary Ann ".to_string(),
        postalcode: "\tV8W 1N6\n".to_string(),
        ..CustomerDetails::default()
    };

    let trimmed = details.trimmed();
    assert_eq!(trimmed.fname, "Mary Ann");
    assert_eq!(trimmed.postalcode, "V8W 1N6");
}

#[test]
fn replace_all_patch_names_every_field() {
    let patch = CustomerPatch::replace_all(&CustomerDetails::default());

    let fields: Vec<_> = patch.iter().map(|(field, _)| field).collect();
    assert_eq!(fields, CustomerField::ALL.to_vec());
}
