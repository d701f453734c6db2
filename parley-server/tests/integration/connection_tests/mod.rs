mod test_rejoin_rules;
