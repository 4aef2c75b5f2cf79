mod support;

mod history_tests;
