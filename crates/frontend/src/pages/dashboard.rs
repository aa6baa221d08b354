//! Role dashboards

use crate::auth::use_identity;
use medibook_core::Role;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct DashboardProps {
    pub role: Role,
}

struct Panel {
    title: &'static str,
    body: &'static str,
}

const ADMINISTRATOR_PANELS: &[Panel] = &[
    Panel {
        title: "Doctors",
        body: "Add doctors, set specialties and manage their availability.",
    },
    Panel {
        title: "Patients",
        body: "Review registered patients and their booking history.",
    },
    Panel {
        title: "Appointments",
        body: "Every booking across the practice, by day or by doctor.",
    },
];

const DOCTOR_PANELS: &[Panel] = &[
    Panel {
        title: "Today",
        body: "Your appointments for today, in order.",
    },
    Panel {
        title: "Availability",
        body: "Open or block slots in your calendar.",
    },
];

const PATIENT_PANELS: &[Panel] = &[
    Panel {
        title: "Upcoming appointments",
        body: "Reschedule or cancel your bookings.",
    },
    Panel {
        title: "Book an appointment",
        body: "Find a doctor and pick a free slot.",
    },
];

const fn panels(role: Role) -> &'static [Panel] {
    match role {
        Role::Administrator => ADMINISTRATOR_PANELS,
        Role::Doctor => DOCTOR_PANELS,
        Role::Patient => PATIENT_PANELS,
    }
}

/// Landing page of a role
#[function_component(Dashboard)]
pub fn dashboard(props: &DashboardProps) -> Html {
    let identity = use_identity();
    let greeting = identity.map_or_else(String::new, |identity| {
        format!("Welcome back, {}", identity.display_name())
    });

    html! {
        <div class="max-w-6xl mx-auto p-6 space-y-6">
            <div>
                <p class="text-sm uppercase tracking-wide text-teal-700">{props.role.as_str()}</p>
                <h1 class="text-2xl font-semibold text-gray-900">{greeting}</h1>
            </div>
            <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                { for panels(props.role).iter().map(|panel| html! {
                    <div class="bg-white rounded-lg shadow p-6">
                        <h2 class="text-lg font-semibold mb-2 text-gray-900">{panel.title}</h2>
                        <p class="text-sm text-gray-600">{panel.body}</p>
                    </div>
                }) }
            </div>
        </div>
    }
}
