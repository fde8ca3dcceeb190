mod remote_query_tests;
