mod health_check;
mod helpers;
mod login;
mod recipes;
mod tags;
mod users;
