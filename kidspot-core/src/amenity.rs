//! Structured amenity tags attached to venues.
//!
//! The enum is closed: unknown tags coming from fixtures or partner data are
//! dropped at the boundary instead of being rejected.
//!
//! # Examples
//! ```
//! use kidspot_core::Amenity;
//!
//! assert_eq!(Amenity::KidsMenu.as_str(), "kids_menu");
//! assert_eq!(Amenity::ChangingTable.label(), "Fraldario");
//! assert_eq!("playroom".parse::<Amenity>(), Ok(Amenity::Playroom));
//! ```

/// A structured venue amenity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Amenity {
    /// Indoor playroom (brinquedoteca).
    Playroom,
    /// Outdoor playground.
    Playground,
    /// Staff supervising children.
    Monitors,
    /// Baby changing table.
    ChangingTable,
    /// Step-free access.
    Accessibility,
    /// Fenced play area.
    FencedArea,
    /// On-site parking.
    Parking,
    /// Pets welcome.
    PetFriendly,
    /// Dedicated children's menu.
    KidsMenu,
    /// Open-air venue.
    Outdoor,
    /// Enclosed venue.
    Indoor,
    /// Both indoor and outdoor areas.
    Mixed,
}

impl Amenity {
    /// Every amenity, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Playroom,
        Self::Playground,
        Self::Monitors,
        Self::ChangingTable,
        Self::Accessibility,
        Self::FencedArea,
        Self::Parking,
        Self::PetFriendly,
        Self::KidsMenu,
        Self::Outdoor,
        Self::Indoor,
        Self::Mixed,
    ];

    /// Return the wire identifier, e.g. `"changing_table"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Playroom => "playroom",
            Self::Playground => "playground",
            Self::Monitors => "monitors",
            Self::ChangingTable => "changing_table",
            Self::Accessibility => "accessibility",
            Self::FencedArea => "fenced_area",
            Self::Parking => "parking",
            Self::PetFriendly => "pet_friendly",
            Self::KidsMenu => "kids_menu",
            Self::Outdoor => "outdoor",
            Self::Indoor => "indoor",
            Self::Mixed => "mixed",
        }
    }

    /// Return the display label shown on amenity chips.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Playroom => "Brinquedoteca",
            Self::Playground => "Parquinho",
            Self::Monitors => "Monitores",
            Self::ChangingTable => "Fraldario",
            Self::Accessibility => "Acessibilidade",
            Self::FencedArea => "Area cercada",
            Self::Parking => "Estacionamento",
            Self::PetFriendly => "Pet-friendly",
            Self::KidsMenu => "Menu kids",
            Self::Outdoor => "Aberto",
            Self::Indoor => "Fechado",
            Self::Mixed => "Misto",
        }
    }

    /// Parse tags leniently, dropping anything outside the enumeration.
    ///
    /// # Examples
    /// ```
    /// use kidspot_core::Amenity;
    ///
    /// let parsed = Amenity::parse_lenient(["playroom", "jacuzzi", "KIDS_MENU"]);
    /// assert_eq!(parsed, vec![Amenity::Playroom, Amenity::KidsMenu]);
    /// ```
    pub fn parse_lenient<I, S>(tags: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .filter_map(|tag| {
                let raw = tag.as_ref();
                let parsed = raw.parse::<Self>().ok();
                if parsed.is_none() {
                    log::debug!("dropping unknown amenity tag '{raw}'");
                }
                parsed
            })
            .collect()
    }
}

impl std::fmt::Display for Amenity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Amenity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|amenity| amenity.as_str() == wanted)
            .ok_or_else(|| format!("unknown amenity '{s}'"))
    }
}
