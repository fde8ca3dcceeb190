mod scope_resolution_tests;
