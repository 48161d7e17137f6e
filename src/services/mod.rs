// Stateless services.

pub mod popup_presenter;
