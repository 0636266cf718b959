use rand::Rng;
use tdspay::domain::address::BillingAddress;

#[test]
fn test_form_fields_are_normalized() {
    let address = BillingAddress::build("", "", "1-800-CALL", "", "", "us", "", "us");
    let value = serde_json::to_value(&address).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), 3);
    assert_eq!(object["phoneNumber"], "1800");
    assert_eq!(object["region"], "US");
    assert_eq!(object["countryCodeAlpha2"], "US");
}

#[test]
fn test_random_phone_numbers_keep_only_digits() {
    const ALPHABET: &[u8] = b"0123456789 -+()ext.ABCxyz";
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let len = rng.gen_range(1..24);
        let phone: String = (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        let expected: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

        let address = BillingAddress::build("", "", &phone, "", "", "", "", "");

        assert_eq!(address.phone_number.as_deref(), Some(expected.as_str()), "input {phone:?}");
        assert!(address.given_name.is_none());
        assert!(address.street_address.is_none());
    }
}

#[test]
fn test_street_only_drops_everything_else() {
    let address = BillingAddress::street_only("742 Evergreen Terrace");
    assert_eq!(
        serde_json::to_string(&address).unwrap(),
        r#"{"streetAddress":"742 Evergreen Terrace"}"#
    );
}
