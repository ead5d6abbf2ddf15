use serde::{Deserialize, Serialize};
use std::fmt;

/// Default map position for partners whose location is unknown (São Paulo city center).
pub const DEFAULT_LOCATION: GeoPoint = GeoPoint {
    lat: -23.5505,
    lng: -46.6333,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl Default for GeoPoint {
    fn default() -> Self {
        DEFAULT_LOCATION
    }
}

/// Street address stored as components. The one-line form is always derived
/// through `Display`, never the other way around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub region: String,
}

impl PostalAddress {
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.number.is_empty()
            && self.complement.as_deref().map_or(true, str::is_empty)
            && self.neighborhood.is_empty()
            && self.city.is_empty()
            && self.region.is_empty()
    }

    pub fn city_region(&self) -> Option<String> {
        match (self.city.is_empty(), self.region.is_empty()) {
            (false, false) => Some(format!("{}/{}", self.city, self.region)),
            (false, true) => Some(self.city.clone()),
            (true, false) => Some(self.region.clone()),
            (true, true) => None,
        }
    }

    /// Best-effort inverse of the `Display` form, used only for records that
    /// carry nothing but the composed string.
    ///
    /// Splits on " - " and ",", so a complement or street that itself contains
    /// one of those separators ends up in the wrong field. The older
    /// `city/region` tail is accepted as well.
    pub fn parse_composed(s: &str) -> Self {
        let parts: Vec<&str> = s.split(" - ").map(str::trim).collect();

        let (street, number) = match parts.first() {
            Some(head) => match head.split_once(',') {
                Some((street, number)) => (street.trim(), number.trim()),
                None => (head.trim(), ""),
            },
            None => ("", ""),
        };

        // Tail is either "city - region" (two segments) or "city/region" (one).
        let last = parts.last().copied().unwrap_or("");
        let slash_tail = parts.len() > 1 && last.contains('/');

        let (neighborhood, complement, city, region) = if slash_tail {
            let (city, region) = last.split_once('/').unwrap_or((last, ""));
            match parts.len() {
                2 => ("", None, city, region),
                3 => (parts[1], None, city, region),
                _ => (parts[parts.len() - 2], Some(parts[1]), city, region),
            }
        } else {
            match parts.len() {
                0 | 1 => ("", None, "", ""),
                2 => ("", None, parts[1], ""),
                3 => ("", None, parts[1], parts[2]),
                4 => (parts[1], None, parts[2], parts[3]),
                n => (parts[n - 3], Some(parts[1]), parts[n - 2], parts[n - 1]),
            }
        };

        Self {
            street: street.to_string(),
            number: number.to_string(),
            complement: complement
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            neighborhood: neighborhood.to_string(),
            city: city.trim().to_string(),
            region: region.trim().to_string(),
        }
    }
}

/// Empty components are left out together with their separators, so an
/// empty address displays as the empty string.
impl fmt::Display for PostalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let street = self.street.trim();
        let number = self.number.trim();
        let head = match (street.is_empty(), number.is_empty()) {
            (false, false) => format!("{}, {}", street, number),
            (false, true) => street.to_string(),
            (true, _) => number.to_string(),
        };

        let parts: Vec<&str> = [
            head.as_str(),
            self.complement.as_deref().unwrap_or(""),
            self.neighborhood.as_str(),
            self.city.as_str(),
            self.region.as_str(),
        ]
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
        write!(f, "{}", parts.join(" - "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PostalAddress {
        PostalAddress {
            street: "Av. Paulista".to_string(),
            number: "1000".to_string(),
            complement: Some("Sala 12".to_string()),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            region: "SP".to_string(),
        }
    }

    #[test]
    fn test_compose_with_complement() {
        assert_eq!(
            sample().to_string(),
            "Av. Paulista, 1000 - Sala 12 - Bela Vista - São Paulo - SP"
        );
    }

    #[test]
    fn test_compose_without_complement() {
        let mut addr = sample();
        addr.complement = None;
        assert_eq!(
            addr.to_string(),
            "Av. Paulista, 1000 - Bela Vista - São Paulo - SP"
        );
    }

    #[test]
    fn test_compose_skips_empty_parts() {
        assert_eq!(PostalAddress::default().to_string(), "");

        let partial = PostalAddress {
            street: "Rua A".to_string(),
            city: "Curitiba".to_string(),
            region: "PR".to_string(),
            ..Default::default()
        };
        assert_eq!(partial.to_string(), "Rua A - Curitiba - PR");

        let city_only = PostalAddress {
            city: "Curitiba".to_string(),
            ..Default::default()
        };
        assert_eq!(city_only.to_string(), "Curitiba");
    }

    #[test]
    fn test_parse_composed_roundtrip_simple() {
        let addr = sample();
        assert_eq!(PostalAddress::parse_composed(&addr.to_string()), addr);

        let mut plain = sample();
        plain.complement = None;
        assert_eq!(PostalAddress::parse_composed(&plain.to_string()), plain);
    }

    #[test]
    fn test_parse_legacy_slash_form() {
        let addr = PostalAddress::parse_composed("Rua A, 10 - Apto 3 - Centro - Curitiba/PR");
        assert_eq!(addr.street, "Rua A");
        assert_eq!(addr.number, "10");
        assert_eq!(addr.complement.as_deref(), Some("Apto 3"));
        assert_eq!(addr.neighborhood, "Centro");
        assert_eq!(addr.city, "Curitiba");
        assert_eq!(addr.region, "PR");

        let addr = PostalAddress::parse_composed("Rua A, 10 - Centro - Curitiba/PR");
        assert_eq!(addr.complement, None);
        assert_eq!(addr.neighborhood, "Centro");
    }

    #[test]
    fn test_parse_is_lossy_on_embedded_separator() {
        // A complement containing " - " shifts the remaining fields.
        let mut addr = sample();
        addr.complement = Some("Bloco B - Sala 4".to_string());
        let parsed = PostalAddress::parse_composed(&addr.to_string());
        assert_ne!(parsed, addr);
        assert_eq!(parsed.region, "SP");
    }

    #[test]
    fn test_city_region() {
        assert_eq!(sample().city_region().as_deref(), Some("São Paulo/SP"));
        assert_eq!(PostalAddress::default().city_region(), None);
        assert!(PostalAddress::default().is_empty());
    }
}
