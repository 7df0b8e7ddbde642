//! Fixed French vocabularies of the property form.

use crate::vocabulary::vocabulary;

vocabulary! {
    /// Kind of building.
    PropertyType {
        House => "Maison",
        Apartment => "Appartement",
        RentalBuilding => "Immeuble de rapport",
    }
}

vocabulary! {
    /// Ownership right held on the property.
    TenureRight {
        FullOwnership => "Pleine propriété",
        Usufruct => "Usufruit",
        BareOwnership => "Nue propriété",
    }
}

vocabulary! {
    /// VAT treatment of the rental.
    VatRegime {
        NotSubject => "Non soumis à TVA",
        Subject => "Soumis à TVA",
    }
}

vocabulary! {
    /// Answer to a yes/no question of the form.
    YesNo {
        No => "Non",
        Yes => "Oui",
    }
}

vocabulary! {
    /// How the property was obtained.
    AcquisitionType {
        Purchase => "Acquisition",
        GiftOrInheritance => "Donation/héritage",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form() {
        assert_eq!(PropertyType::default().as_str(), "Maison");
        assert_eq!(TenureRight::default().as_str(), "Pleine propriété");
        assert_eq!(VatRegime::default().as_str(), "Non soumis à TVA");
        assert_eq!(YesNo::default().as_str(), "Non");
        assert_eq!(AcquisitionType::default().as_str(), "Acquisition");
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(
            PropertyType::parse("Immeuble de rapport"),
            Some(PropertyType::RentalBuilding)
        );
        assert_eq!(TenureRight::parse("Nue propriété"), Some(TenureRight::BareOwnership));
        assert_eq!(
            AcquisitionType::parse("Donation/héritage"),
            Some(AcquisitionType::GiftOrInheritance)
        );
        assert_eq!(YesNo::parse("oui"), None);
    }

    #[test]
    fn test_serde_uses_labels() {
        assert_eq!(
            serde_json::to_string(&VatRegime::Subject).unwrap(),
            "\"Soumis à TVA\""
        );
        let parsed: PropertyType = serde_json::from_str("\"Appartement\"").unwrap();
        assert_eq!(parsed, PropertyType::Apartment);
    }
}
