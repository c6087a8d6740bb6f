//! Property-based tests for `ReservationKey` and email normalization.

use super::{normalize_email, Destination, Reservation, ReservationKey};
use crate::schedule::TravelDate;
use crate::seat::SeatId;
use chrono::NaiveDate;
use proptest::prelude::*;

// Local parts may contain underscores, which the key format also uses.
fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-zA-Z][a-zA-Z0-9_.]{0,12}", "[a-z]{2,8}", prop::sample::select(vec!["lk", "com", "ac.lk"]))
        .prop_map(|(local, host, tld)| format!("{local}@{host}.{tld}"))
}

fn seat_strategy() -> impl Strategy<Value = SeatId> {
    (SeatId::MIN..=SeatId::MAX).prop_map(|n| SeatId::try_from(n).unwrap())
}

fn date_strategy() -> impl Strategy<Value = TravelDate> {
    (0i64..3650).prop_map(|offset| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        TravelDate::from(base + chrono::Duration::days(offset))
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Normalizing twice changes nothing, and case never matters
    #[test]
    fn normalize_email_idempotent(email in email_strategy()) {
        let once = normalize_email(&email).unwrap();
        prop_assert_eq!(normalize_email(&once).unwrap(), once.clone());
        prop_assert_eq!(normalize_email(&email.to_uppercase()).unwrap(), once);
    }

    // Surrounding whitespace is ignored
    #[test]
    fn normalize_email_trims(email in email_strategy(), pad in "[ \t]{0,3}") {
        let padded = format!("{pad}{email}{pad}");
        prop_assert_eq!(normalize_email(&padded).unwrap(), normalize_email(&email).unwrap());
    }

    // The string form parses back even when the email contains underscores
    #[test]
    fn reservation_key_string_form_parses_back(
        email in email_strategy(),
        seat in seat_strategy(),
        date in date_strategy()
    ) {
        let key = ReservationKey::new(&email, seat, date).unwrap();
        let parsed: ReservationKey = key.to_string().parse().unwrap();
        prop_assert_eq!(parsed, key);
    }

    // Keys are equal exactly when their normalized parts are
    #[test]
    fn reservation_key_equality(
        a in (email_strategy(), seat_strategy(), date_strategy()),
        b in (email_strategy(), seat_strategy(), date_strategy())
    ) {
        let key_a = ReservationKey::new(&a.0, a.1, a.2).unwrap();
        let key_b = ReservationKey::new(&b.0, b.1, b.2).unwrap();
        let same = normalize_email(&a.0).unwrap() == normalize_email(&b.0).unwrap()
            && a.1 == b.1
            && a.2 == b.2;
        prop_assert_eq!(key_a == key_b, same);
    }

    // Built reservations keep their key and start active
    #[test]
    fn reservation_preserves_key(
        email in email_strategy(),
        seat in seat_strategy(),
        date in date_strategy(),
        destination in prop::sample::select(Destination::ALL.to_vec())
    ) {
        let key = ReservationKey::new(&email, seat, date).unwrap();
        let reservation = Reservation::builder(key.clone())
            .full_name("Test Passenger")
            .phone_number("0771234567")
            .enrollment_number("D/BCS/23/0001")
            .destination(destination)
            .build()
            .unwrap();

        prop_assert_eq!(reservation.key(), &key);
        prop_assert_eq!(reservation.destination(), destination);
        prop_assert!(reservation.is_active());
        prop_assert!(!reservation.is_checked_in());
    }
}
