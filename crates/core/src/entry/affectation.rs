//! Fixed vocabulary of entry categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an accounting entry.
///
/// Serialized as its French label, which is also what the database stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Affectation {
    /// Appels de Fonds/Charges de copropriété
    #[serde(rename = "Appels de Fonds/Charges de copropriété")]
    ChargesCopropriete,
    /// Assurance Emprunteur (Hors échéancier d'emprunt)
    #[serde(rename = "Assurance Emprunteur (Hors échéancier d'emprunt)")]
    AssuranceEmprunteur,
    /// Assurance PNO
    #[serde(rename = "Assurance PNO")]
    AssurancePno,
    /// Autre
    #[serde(rename = "Autre")]
    Autre,
    /// Caution
    #[serde(rename = "Caution")]
    Caution,
    /// Cotisation foncière des entreprises (CFE)
    #[serde(rename = "Cotisation foncière des entreprises (CFE)")]
    Cfe,
    /// Eau
    #[serde(rename = "Eau")]
    Eau,
    /// Echeance emprunt
    #[serde(rename = "Echeance emprunt")]
    EcheanceEmprunt,
    /// Electricité
    #[serde(rename = "Electricité")]
    Electricite,
    /// Entretien du bien/Nettoyage
    #[serde(rename = "Entretien du bien/Nettoyage")]
    Entretien,
    /// Frais bancaires
    #[serde(rename = "Frais bancaires")]
    FraisBancaires,
    /// Frais de comptabilité
    #[serde(rename = "Frais de comptabilité")]
    FraisComptabilite,
    /// Frais postaux
    #[serde(rename = "Frais postaux")]
    FraisPostaux,
    /// Gaz
    #[serde(rename = "Gaz")]
    Gaz,
    /// Internet
    #[serde(rename = "Internet")]
    Internet,
    /// Loyer
    #[default]
    #[serde(rename = "Loyer")]
    Loyer,
    /// Mobilier
    #[serde(rename = "Mobilier")]
    Mobilier,
    /// Publicité/Annonces
    #[serde(rename = "Publicité/Annonces")]
    Publicite,
    /// Remboursement Assurance
    #[serde(rename = "Remboursement Assurance")]
    RemboursementAssurance,
    /// Taxe foncière
    #[serde(rename = "Taxe foncière")]
    TaxeFonciere,
    /// Travaux
    #[serde(rename = "Travaux")]
    Travaux,
}

impl Affectation {
    /// Every category, in display order.
    pub const ALL: [Self; 21] = [
        Self::ChargesCopropriete,
        Self::AssuranceEmprunteur,
        Self::AssurancePno,
        Self::Autre,
        Self::Caution,
        Self::Cfe,
        Self::Eau,
        Self::EcheanceEmprunt,
        Self::Electricite,
        Self::Entretien,
        Self::FraisBancaires,
        Self::FraisComptabilite,
        Self::FraisPostaux,
        Self::Gaz,
        Self::Internet,
        Self::Loyer,
        Self::Mobilier,
        Self::Publicite,
        Self::RemboursementAssurance,
        Self::TaxeFonciere,
        Self::Travaux,
    ];

    /// Returns the label stored and displayed for this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ChargesCopropriete => "Appels de Fonds/Charges de copropriété",
            Self::AssuranceEmprunteur => "Assurance Emprunteur (Hors échéancier d'emprunt)",
            Self::AssurancePno => "Assurance PNO",
            Self::Autre => "Autre",
            Self::Caution => "Caution",
            Self::Cfe => "Cotisation foncière des entreprises (CFE)",
            Self::Eau => "Eau",
            Self::EcheanceEmprunt => "Echeance emprunt",
            Self::Electricite => "Electricité",
            Self::Entretien => "Entretien du bien/Nettoyage",
            Self::FraisBancaires => "Frais bancaires",
            Self::FraisComptabilite => "Frais de comptabilité",
            Self::FraisPostaux => "Frais postaux",
            Self::Gaz => "Gaz",
            Self::Internet => "Internet",
            Self::Loyer => "Loyer",
            Self::Mobilier => "Mobilier",
            Self::Publicite => "Publicité/Annonces",
            Self::RemboursementAssurance => "Remboursement Assurance",
            Self::TaxeFonciere => "Taxe foncière",
            Self::Travaux => "Travaux",
        }
    }

    /// Parses a stored label. Surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// Returns true if an entry of this category needs at least one attachment
    /// to be complete.
    #[must_use]
    pub const fn requires_attachment(&self) -> bool {
        matches!(
            self,
            Self::ChargesCopropriete
                | Self::Autre
                | Self::Cfe
                | Self::Entretien
                | Self::FraisComptabilite
                | Self::FraisPostaux
                | Self::Internet
                | Self::Mobilier
                | Self::Publicite
                | Self::RemboursementAssurance
                | Self::TaxeFonciere
                | Self::Travaux
        )
    }
}

impl fmt::Display for Affectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_every_label() {
        for affectation in Affectation::ALL {
            assert_eq!(Affectation::parse(affectation.as_str()), Some(affectation));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Affectation::parse(""), None);
        assert_eq!(Affectation::parse("loyer"), None);
        assert_eq!(Affectation::parse("Salaire"), None);
    }

    #[test]
    fn test_mandatory_set_has_twelve_members() {
        let count = Affectation::ALL
            .iter()
            .filter(|a| a.requires_attachment())
            .count();
        assert_eq!(count, 12);
    }

    #[rstest]
    #[case(Affectation::Travaux, true)]
    #[case(Affectation::TaxeFonciere, true)]
    #[case(Affectation::Cfe, true)]
    #[case(Affectation::Loyer, false)]
    #[case(Affectation::Eau, false)]
    #[case(Affectation::EcheanceEmprunt, false)]
    fn test_requires_attachment(#[case] affectation: Affectation, #[case] expected: bool) {
        assert_eq!(affectation.requires_attachment(), expected);
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&Affectation::Publicite).unwrap();
        assert_eq!(json, "\"Publicité/Annonces\"");
        let back: Affectation = serde_json::from_str("\"Taxe foncière\"").unwrap();
        assert_eq!(back, Affectation::TaxeFonciere);
    }
}
