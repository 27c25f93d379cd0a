mod log_notifier_tests;
