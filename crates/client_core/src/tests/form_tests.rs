use super::*;

fn filled_form() -> FormState {
    let mut form = FormState::new();
    form.set(FormField::TotalSqft, "1200");
    form.set(FormField::Bhk, "2");
    form.set(FormField::Bath, "2");
    form.set(FormField::Location, "Whitefield");
    form
}

#[test]
fn new_form_is_empty() {
    let form = FormState::new();
    for field in FormField::ALL {
        assert_eq!(form.get(field), None);
    }
    assert!(!form.is_complete());
}

#[test]
fn last_write_wins_per_field_regardless_of_interleaving() {
    let mut form = FormState::new();
    form.set(FormField::Bhk, "1");
    form.set(FormField::Location, "Indiranagar");
    form.set(FormField::Bhk, "3");
    form.set(FormField::TotalSqft, "900");
    form.set(FormField::Location, "Whitefield");
    form.set(FormField::Bath, "2");
    form.set(FormField::TotalSqft, "1500");

    assert_eq!(form.get(FormField::TotalSqft), Some("1500"));
    assert_eq!(form.get(FormField::Bhk), Some("3"));
    assert_eq!(form.get(FormField::Bath), Some("2"));
    assert_eq!(form.get(FormField::Location), Some("Whitefield"));
}

#[test]
fn blank_value_clears_field() {
    let mut form = filled_form();
    form.set(FormField::Location, "   ");
    assert_eq!(form.get(FormField::Location), None);
    assert!(!form.is_complete());
}

#[test]
fn complete_form_serializes_to_request() {
    let request = filled_form()
        .validate(&FormLimits::default())
        .expect("valid form");
    assert_eq!(
        request,
        PredictHomePriceRequest {
            total_sqft: 1200.0,
            bhk: 2,
            bath: 2,
            location: "Whitefield".to_string(),
        }
    );
}

#[test]
fn values_are_trimmed_before_parsing() {
    let mut form = filled_form();
    form.set(FormField::TotalSqft, " 1250.5 ");
    form.set(FormField::Location, " Whitefield ");
    let request = form.validate(&FormLimits::default()).expect("valid form");
    assert_eq!(request.total_sqft, 1250.5);
    assert_eq!(request.location, "Whitefield");
}

#[test]
fn missing_fields_are_reported_in_field_order() {
    let mut form = FormState::new();
    form.set(FormField::Location, "Whitefield");
    assert_eq!(
        form.validate(&FormLimits::default()),
        Err(ValidationError::Missing(FormField::TotalSqft))
    );

    form.set(FormField::TotalSqft, "1200");
    form.set(FormField::Bhk, "2");
    assert_eq!(
        form.validate(&FormLimits::default()),
        Err(ValidationError::Missing(FormField::Bath))
    );
}

#[test]
fn malformed_numbers_are_rejected() {
    for raw in ["twelve", "1,200", "NaN", "inf", "-inf"] {
        let mut form = filled_form();
        form.set(FormField::TotalSqft, raw);
        assert_eq!(
            form.validate(&FormLimits::default()),
            Err(ValidationError::Malformed {
                field: FormField::TotalSqft,
                value: raw.to_string(),
            }),
            "{raw} should be malformed"
        );
    }

    let mut form = filled_form();
    form.set(FormField::Bhk, "2.5");
    assert!(matches!(
        form.validate(&FormLimits::default()),
        Err(ValidationError::Malformed {
            field: FormField::Bhk,
            ..
        })
    ));
}

#[test]
fn room_counts_outside_one_to_five_are_rejected() {
    for raw in ["0", "6", "-1", "300"] {
        let mut form = filled_form();
        form.set(FormField::Bath, raw);
        assert_eq!(
            form.validate(&FormLimits::default()),
            Err(ValidationError::OutOfRange {
                field: FormField::Bath,
                value: raw.to_string(),
            })
        );
    }

    let mut form = filled_form();
    form.set(FormField::Bhk, "5");
    form.set(FormField::Bath, "1");
    assert!(form.validate(&FormLimits::default()).is_ok());
}

#[test]
fn area_respects_configured_limits() {
    let limits = FormLimits {
        min_sqft: 500.0,
        max_sqft: 2000.0,
    };
    let mut form = filled_form();

    form.set(FormField::TotalSqft, "499.9");
    assert!(matches!(
        form.validate(&limits),
        Err(ValidationError::OutOfRange { .. })
    ));

    form.set(FormField::TotalSqft, "2000");
    assert!(form.validate(&limits).is_ok());

    form.set(FormField::TotalSqft, "0");
    let wide = FormLimits {
        min_sqft: f64::MIN,
        max_sqft: f64::MAX,
    };
    assert!(matches!(
        form.validate(&wide),
        Err(ValidationError::OutOfRange { .. })
    ));
}
