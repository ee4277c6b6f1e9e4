mod common;
mod rubric;
mod routing;
