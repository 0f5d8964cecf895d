//! The fixed set of catalog categories shown in the storefront sidebar.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A brand sub-link under a category. Used for navigation only; the backend
/// does not filter on it unless it is passed as a subcategory path segment.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Brand {
    pub title: &'static str,
    pub slug: &'static str,
}

const fn brand(title: &'static str, slug: &'static str) -> Brand {
    Brand { title, slug }
}

const SOLAR_PANEL_BRANDS: &[Brand] = &[
    brand("Risen", "risen"),
    brand("Trina Solar", "trina-solar"),
    brand("Jinko Solar", "jinko-solar"),
    brand("Leapton", "leapton"),
    brand("Inter Energy", "inter-energy"),
    brand("Altek", "altek"),
    brand("Longi Solar", "longi-solar"),
    brand("JA Solar", "ja-solar"),
    brand("Canadian Solar", "canadian-solar"),
    brand("Sola", "sola"),
    brand("TONGWEI", "tongwei"),
    brand("Luxen", "luxen"),
    brand("Ulica", "ulica"),
    brand("Astronergy", "astronergy"),
    brand("SunPro", "sunpro"),
    brand("ZNSHINE", "znshine"),
    brand("HT-SAAE", "ht-saae"),
    brand("Horay Solar", "horay-solar"),
];

const INVERTER_BRANDS: &[Brand] = &[
    brand("Deye", "deye"),
    brand("Altek", "altek"),
    brand("Axioma Energy", "axioma-energy"),
    brand("LuxPower", "luxpower"),
    brand("Sofar Solar", "sofar-solar"),
    brand("BlueSun", "bluesun"),
    brand("Huawei", "huawei"),
    brand("Felicitysolar", "felicitysolar"),
    brand("Must", "must"),
    brand("Solis", "solis"),
    brand("Afore", "afore"),
    brand("Fronius", "fronius"),
    brand("Q-Power", "q-power"),
];

/// Product category key.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    SolarPanels,
    Inverters,
    Fuses,
    Ups,
    Cables,
    Optimizers,
    Controllers,
    Mounting,
    Batteries,
    DroneBatteries,
    ChargingStations,
    Mushrooms,
    Boilers,
    AirConditioners,
}

impl Category {
    /// All categories in sidebar order.
    pub const ALL: [Category; 14] = [
        Category::SolarPanels,
        Category::Inverters,
        Category::Fuses,
        Category::Ups,
        Category::Cables,
        Category::Optimizers,
        Category::Controllers,
        Category::Mounting,
        Category::Batteries,
        Category::DroneBatteries,
        Category::ChargingStations,
        Category::Mushrooms,
        Category::Boilers,
        Category::AirConditioners,
    ];

    /// The URL key used by the backend, e.g. `"drone-batteries"`.
    pub fn key(&self) -> &'static str {
        match self {
            Category::SolarPanels => "solar-panels",
            Category::Inverters => "inverters",
            Category::Fuses => "fuses",
            Category::Ups => "ups",
            Category::Cables => "cables",
            Category::Optimizers => "optimizers",
            Category::Controllers => "controllers",
            Category::Mounting => "mounting",
            Category::Batteries => "batteries",
            Category::DroneBatteries => "drone-batteries",
            Category::ChargingStations => "charging-stations",
            Category::Mushrooms => "mushrooms",
            Category::Boilers => "boilers",
            Category::AirConditioners => "air-conditioners",
        }
    }

    /// Sidebar title as shown on the storefront.
    pub fn title(&self) -> &'static str {
        match self {
            Category::SolarPanels => "Сонячні панелі",
            Category::Inverters => "Сонячні інвертори",
            Category::Fuses => "Запобіжники",
            Category::Ups => "Джерела безперебійного живлення",
            Category::Cables => "Кабелі і комплектуючі",
            Category::Optimizers => "Оптимізатори потужності",
            Category::Controllers => "Контролер",
            Category::Mounting => "Кріплення для сонячних модулів",
            Category::Batteries => "Акумулятори, батареї",
            Category::DroneBatteries => "Акумулятори для дронів",
            Category::ChargingStations => "Зарядні станції, портативні системи",
            Category::Mushrooms => "Гриби, грибні добавки",
            Category::Boilers => "Твердопаливні котли",
            Category::AirConditioners => "Кондиціонери",
        }
    }

    pub fn brands(&self) -> &'static [Brand] {
        match self {
            Category::SolarPanels => SOLAR_PANEL_BRANDS,
            Category::Inverters => INVERTER_BRANDS,
            _ => &[],
        }
    }

    pub fn find_brand(&self, slug: &str) -> Option<&'static Brand> {
        self.brands().iter().find(|b| b.slug == slug)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s)
            .ok_or(())
    }
}
