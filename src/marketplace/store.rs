use async_trait::async_trait;
use tokio::sync::RwLock;

use super::models::{Bundle, HireRequest, Organizer};

/// Keyed store for marketplace listings. The seeded in-memory implementation
/// stands in for a real backend; handlers only ever see the trait, so
/// swapping in a persistent store touches nothing else.
#[async_trait]
pub trait OrganizerStore: Send + Sync {
    async fn list(&self) -> Vec<Organizer>;
    async fn get(&self, id: &str) -> Option<Organizer>;
    async fn record_hire(&self, hire: HireRequest) -> HireRequest;
}

pub struct InMemoryOrganizers {
    organizers: RwLock<Vec<Organizer>>,
    hires: RwLock<Vec<HireRequest>>,
}

impl InMemoryOrganizers {
    pub fn seeded() -> Self {
        Self {
            organizers: RwLock::new(seed_organizers()),
            hires: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OrganizerStore for InMemoryOrganizers {
    async fn list(&self) -> Vec<Organizer> {
        self.organizers.read().await.clone()
    }

    async fn get(&self, id: &str) -> Option<Organizer> {
        self.organizers
            .read()
            .await
            .iter()
            .find(|o| o.id == id)
            .cloned()
    }

    async fn record_hire(&self, hire: HireRequest) -> HireRequest {
        self.hires.write().await.push(hire.clone());
        hire
    }
}

fn seed_organizers() -> Vec<Organizer> {
    vec![
        Organizer {
            id: "1".to_owned(),
            name: "Sarah Chen".to_owned(),
            bio: "Event planning specialist with 5+ years organizing group activities and corporate events.".to_owned(),
            hourly_rate: 25,
            rating: 4.8,
            review_count: 127,
            skills: vec![
                "Event Planning".to_owned(),
                "Group Coordination".to_owned(),
                "Budget Management".to_owned(),
            ],
            availability: "Available".to_owned(),
            bundles: vec![
                Bundle {
                    id: "b1-1".to_owned(),
                    title: "Night Out Planning".to_owned(),
                    description: "Complete planning for a perfect night out including restaurant reservations, activity coordination, and group logistics.".to_owned(),
                    price: 25,
                    duration: "1 evening".to_owned(),
                    tags: vec!["nightlife".to_owned(), "restaurants".to_owned(), "quick".to_owned()],
                    is_active: true,
                },
                Bundle {
                    id: "b1-2".to_owned(),
                    title: "Weekend Adventure Package".to_owned(),
                    description: "Full weekend trip planning with accommodation research, activity booking, and detailed itinerary creation.".to_owned(),
                    price: 75,
                    duration: "1 weekend".to_owned(),
                    tags: vec!["travel".to_owned(), "adventure".to_owned(), "comprehensive".to_owned()],
                    is_active: true,
                },
            ],
        },
        Organizer {
            id: "2".to_owned(),
            name: "Marcus Johnson".to_owned(),
            bio: "Professional project manager who loves bringing people together through memorable experiences.".to_owned(),
            hourly_rate: 30,
            rating: 4.9,
            review_count: 203,
            skills: vec![
                "Project Management".to_owned(),
                "Team Building".to_owned(),
                "Social Events".to_owned(),
            ],
            availability: "Available".to_owned(),
            bundles: vec![Bundle {
                id: "b2-1".to_owned(),
                title: "Team Building Session".to_owned(),
                description: "Professional team building event with activities designed to strengthen group bonds and communication.".to_owned(),
                price: 100,
                duration: "1 day".to_owned(),
                tags: vec!["team".to_owned(), "professional".to_owned()],
                is_active: true,
            }],
        },
    ]
}
