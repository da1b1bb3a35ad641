use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Fixed reference rates for display-time conversion. The stored `value`
/// is always the USD base amount.
pub const USD_TO_COP: f64 = 4200.0;
pub const USD_TO_MXN: f64 = 20.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStatus {
    #[serde(rename = "Lead In")]
    LeadIn,
    #[serde(rename = "Contactado")]
    Contacted,
    #[serde(rename = "Reunión Agendada")]
    MeetingScheduled,
    #[serde(rename = "Propuesta Enviada")]
    ProposalSent,
    #[serde(rename = "Negociación")]
    Negotiating,
    #[serde(rename = "Ganado")]
    Won,
    #[serde(rename = "Perdido")]
    Lost,
}

impl DealStatus {
    /// Every status a deal can carry, in pipeline order. `Won` and `Lost`
    /// are terminal and never shown on the active board.
    pub const ALL: [DealStatus; 7] = [
        DealStatus::LeadIn,
        DealStatus::Contacted,
        DealStatus::MeetingScheduled,
        DealStatus::ProposalSent,
        DealStatus::Negotiating,
        DealStatus::Won,
        DealStatus::Lost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeadIn => "Lead In",
            Self::Contacted => "Contactado",
            Self::MeetingScheduled => "Reunión Agendada",
            Self::ProposalSent => "Propuesta Enviada",
            Self::Negotiating => "Negociación",
            Self::Won => "Ganado",
            Self::Lost => "Perdido",
        }
    }
}

/// The five stages that make up the active pipeline board.
pub const PIPELINE_STAGES: [DealStatus; 5] = [
    DealStatus::LeadIn,
    DealStatus::Contacted,
    DealStatus::MeetingScheduled,
    DealStatus::ProposalSent,
    DealStatus::Negotiating,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Colombia,
    #[serde(rename = "México")]
    Mexico,
    Otros,
}

impl Country {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Colombia => "Colombia",
            Self::Mexico => "México",
            Self::Otros => "Otros",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    #[serde(rename = "Llamada")]
    Call,
    #[serde(rename = "Correo")]
    Email,
    #[serde(rename = "Reunión")]
    Meeting,
    #[serde(rename = "Nota")]
    Note,
}

/// A logged or scheduled interaction owned by exactly one deal. Activities
/// are append-only: they are never edited or removed once scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub content: String,
    /// ISO calendar date (`YYYY-MM-DD`); may be past or future.
    pub date: String,
    /// Reserved; always false at creation and never flipped anywhere yet.
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    /// Base amount in USD.
    pub value: f64,
    pub contact_name: String,
    pub organization: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub status: DealStatus,
    pub priority: Priority,
    #[serde(default)]
    pub activities: Vec<Activity>,
    /// Mirrors the content of the most recently scheduled activity; a
    /// display convenience, not an independent fact.
    #[serde(default)]
    pub next_steps: String,
    pub created_at: String,
    pub country: Country,
    /// Empty when no seller has been assigned yet.
    #[serde(default)]
    pub seller_id: String,
}

impl Deal {
    /// A fresh unsaved lead with the defaults the creation form starts
    /// from. The id is client-generated and never changes afterwards.
    pub fn draft() -> Self {
        Self {
            id: format!("deal-{}", uuid::Uuid::new_v4()),
            title: "Nuevo Prospecto".to_string(),
            value: 0.0,
            contact_name: String::new(),
            organization: String::new(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            status: DealStatus::LeadIn,
            priority: Priority::Medium,
            activities: Vec::new(),
            next_steps: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
            country: Country::Colombia,
            seller_id: SELLERS[0].id.clone(),
        }
    }

    /// Appends a new activity and mirrors its content into `next_steps`.
    /// Prior activities are left untouched.
    pub fn schedule_activity(&mut self, kind: ActivityKind, content: &str, date: &str) -> Activity {
        let activity = Activity {
            id: format!("act-{}", uuid::Uuid::new_v4()),
            kind,
            content: content.to_string(),
            date: date.to_string(),
            completed: false,
        };
        self.next_steps = activity.content.clone();
        self.activities.push(activity.clone());
        activity
    }

    pub fn value_cop(&self) -> f64 {
        self.value * USD_TO_COP
    }

    pub fn value_mxn(&self) -> f64 {
        self.value * USD_TO_MXN
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub name: String,
}

/// Fixed seller roster, seeded at startup and immutable at runtime.
pub static SELLERS: Lazy<Vec<Seller>> = Lazy::new(|| {
    vec![
        Seller { id: "sel-1".to_string(), name: "Andrés Mendoza".to_string() },
        Seller { id: "sel-2".to_string(), name: "Beatriz Salazar".to_string() },
        Seller { id: "sel-3".to_string(), name: "Carlos Ibáñez".to_string() },
        Seller { id: "sel-4".to_string(), name: "Daniela Torres".to_string() },
    ]
});

/// Display name for a seller id; a dangling reference degrades to "N/A"
/// rather than failing.
pub fn seller_name(seller_id: &str) -> String {
    SELLERS
        .iter()
        .find(|s| s.id == seller_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| "N/A".to_string())
}

/// The starter dataset used when local storage has no deal collection yet.
pub fn seed_deals() -> Vec<Deal> {
    let now = chrono::Utc::now().to_rfc3339();
    vec![
        Deal {
            id: "1".to_string(),
            title: "Acuerdo con Restaurante El Olivo".to_string(),
            value: 12000.0,
            contact_name: "Carlos García".to_string(),
            organization: "El Olivo Gourmet".to_string(),
            phone: "+57 300 123 4567".to_string(),
            email: "carlos@elolivo.com".to_string(),
            address: "Calle 45 #12-34, Bogotá".to_string(),
            status: DealStatus::LeadIn,
            priority: Priority::High,
            activities: Vec::new(),
            next_steps: "Llamar para confirmar degustación".to_string(),
            created_at: now.clone(),
            country: Country::Colombia,
            seller_id: "sel-1".to_string(),
        },
        Deal {
            id: "2".to_string(),
            title: "Suministro Cadena Foodie".to_string(),
            value: 45000.0,
            contact_name: "Lucía Méndez".to_string(),
            organization: "Foodie Corp".to_string(),
            phone: "+52 55 1234 5678".to_string(),
            email: "lucia.m@foodiecorp.mx".to_string(),
            address: "Av. Reforma 222, CDMX".to_string(),
            status: DealStatus::Contacted,
            priority: Priority::Medium,
            activities: Vec::new(),
            next_steps: "Enviar catálogo de temporada".to_string(),
            created_at: now,
            country: Country::Mexico,
            seller_id: "sel-2".to_string(),
        },
    ]
}
