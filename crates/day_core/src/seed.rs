use crate::model::{Location, Task, TaskStatus};

struct SeedTask {
    id: &'static str,
    title: &'static str,
    scheduled_time: &'static str,
    place: &'static str,
    lat: f64,
    lng: f64,
    distance: u32,
    notes: Option<&'static str>,
}

const SEED: [SeedTask; 5] = [
    SeedTask {
        id: "1",
        title: "Morning coffee at local café",
        scheduled_time: "08:30 AM",
        place: "Café Soleil",
        lat: 48.8566,
        lng: 2.3522,
        distance: 45,
        notes: Some("Try their croissants!"),
    },
    SeedTask {
        id: "2",
        title: "Visit Louvre Museum",
        scheduled_time: "10:00 AM",
        place: "Louvre Museum",
        lat: 48.8606,
        lng: 2.3376,
        distance: 1200,
        notes: Some("Pre-booked tickets. Don't forget to see Mona Lisa."),
    },
    SeedTask {
        id: "3",
        title: "Lunch at Le Marais",
        scheduled_time: "01:00 PM",
        place: "L'As du Fallafel",
        lat: 48.8575,
        lng: 2.3598,
        distance: 3500,
        notes: None,
    },
    SeedTask {
        id: "4",
        title: "Seine River walk",
        scheduled_time: "03:30 PM",
        place: "Pont des Arts",
        lat: 48.8583,
        lng: 2.3375,
        distance: 5200,
        notes: Some("Great spot for photos"),
    },
    SeedTask {
        id: "5",
        title: "Dinner reservation",
        scheduled_time: "07:30 PM",
        place: "Le Comptoir du Relais",
        lat: 48.8518,
        lng: 2.3392,
        distance: 8900,
        notes: None,
    },
];

/// The day's plan loaded at startup. Every task starts pending.
pub fn seed_tasks() -> Vec<Task> {
    SEED.iter()
        .map(|seed| Task {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            scheduled_time: seed.scheduled_time.to_string(),
            location: Location {
                name: seed.place.to_string(),
                lat: seed.lat,
                lng: seed.lng,
            },
            distance: seed.distance,
            status: TaskStatus::Pending,
            reached_at: None,
            notes: seed.notes.map(str::to_string),
        })
        .collect()
}
