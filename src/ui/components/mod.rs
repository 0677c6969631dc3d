pub mod flower_view;
pub mod menu;
pub mod popup;
pub mod progress_bar;
pub mod schedule_view;
pub mod yut_view;
