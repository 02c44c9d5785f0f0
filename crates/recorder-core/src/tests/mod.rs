mod history;
mod page;
