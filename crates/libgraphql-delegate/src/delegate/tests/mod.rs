mod graphql_error_tests;
