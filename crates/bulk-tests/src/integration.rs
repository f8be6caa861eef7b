// Live-database tests. They reset the `public` schema, so run them one at a
// time against a scratch database:
//   TEST_PG_URL=postgres://... cargo test -p bulk-tests -- --ignored --test-threads=1
