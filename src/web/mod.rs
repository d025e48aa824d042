//! Server-rendered HTML views.

mod views;

pub use views::{
    FlashView, FormValues, FormView, IndexView, NotFoundView, PageView, ShowView, TaskView,
    ViewEngine, ViewError,
};
