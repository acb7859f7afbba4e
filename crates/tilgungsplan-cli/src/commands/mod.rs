pub mod tilgungsplan;
