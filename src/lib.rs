pub mod shared {
    pub mod core {
        pub mod actor;
        pub mod csv;
        pub mod decision;
        pub mod primitives;
    }
    pub mod application {
        pub mod command_runner;
        pub mod errors;
    }
    pub mod infrastructure {
        pub mod state_store;
    }
}

pub mod modules {
    pub mod crm {
        pub mod core {
            pub mod decision;
            pub mod events;
            pub mod projections;
            pub mod state;
        }
        pub mod use_cases {
            pub mod delete_subscriber;
            pub mod import_subscribers;
            pub mod maintain_subscriber;
            pub mod reference_data;
            pub mod subscriber_queries;
            pub mod subscriber_status;
        }
        pub mod handler;
        pub mod inbound {
            pub mod graphql;
            pub mod http;
        }
    }
    pub mod tickets {
        pub mod core {
            pub mod decision;
            pub mod events;
            pub mod presence;
            pub mod projections;
            pub mod state;
        }
        pub mod use_cases {
            pub mod annotate_ticket;
            pub mod bulk_resolve;
            pub mod change_status;
            pub mod claim_ticket;
            pub mod open_ticket;
            pub mod remove_tickets;
            pub mod ticket_queries;
        }
        pub mod handler;
        pub mod inbound {
            pub mod graphql;
            pub mod http;
        }
    }
    pub mod staff {
        pub mod core {
            pub mod decision;
            pub mod events;
            pub mod projections;
            pub mod shift_policy;
            pub mod state;
        }
        pub mod use_cases {
            pub mod attendance_queries;
            pub mod shifts;
        }
        pub mod handler;
        pub mod inbound {
            pub mod http;
        }
    }
    pub mod reporting {
        pub mod core {
            pub mod kpis;
        }
        pub mod use_cases {
            pub mod ticket_report;
        }
        pub mod handler;
        pub mod inbound {
            pub mod graphql;
            pub mod http;
        }
    }
}

pub mod shell;
