use pretty_assertions::assert_eq;
use super::*;

mod declare {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_declare_and_lookup() {
        let environment = Environment::new_global();
        environment.borrow_mut().declare("x", Value::Number(1.0), false).unwrap();

        assert_eq!(environment.borrow().lookup("x"), Ok(Value::Number(1.0)));
        assert!(environment.borrow().has_variable("x"));
        assert!(!environment.borrow().is_constant("x"));
    }

    #[test]
    pub fn test_redeclaration_fails_in_same_frame() {
        let environment = Environment::new_global();
        environment.borrow_mut().declare("x", Value::Number(1.0), true).unwrap();

        assert_eq!(environment.borrow_mut().declare("x", Value::Number(2.0), false),
                   Err(ErrorKind::Redeclaration(String::from("x"))));

        // Failed declarations leave the frame unchanged
        assert_eq!(environment.borrow().lookup("x"), Ok(Value::Number(1.0)));
        assert!(environment.borrow().is_constant("x"));
    }

    #[test]
    pub fn test_shadowing_in_child_frame() {
        let global = Environment::new_global();
        global.borrow_mut().declare("x", Value::Number(1.0), true).unwrap();

        let child = Environment::new_with_parent(Rc::clone(&global));
        child.borrow_mut().declare("x", Value::Number(2.0), false).unwrap();

        assert_eq!(child.borrow().lookup("x"), Ok(Value::Number(2.0)));
        assert_eq!(global.borrow().lookup("x"), Ok(Value::Number(1.0)));
    }
}

mod assign {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_assign_walks_to_owner() {
        let global = Environment::new_global();
        global.borrow_mut().declare("x", Value::Number(1.0), false).unwrap();

        let child = Environment::new_with_parent(Rc::clone(&global));
        child.borrow_mut().assign("x", Value::Number(5.0)).unwrap();

        assert_eq!(global.borrow().lookup("x"), Ok(Value::Number(5.0)));
        assert!(!child.borrow().has_variable("x"));
    }

    #[test]
    pub fn test_constant_checked_in_owning_frame() {
        let global = Environment::new_global();
        global.borrow_mut().declare("c", Value::Number(1.0), true).unwrap();

        let child = Environment::new_with_parent(Rc::clone(&global));

        assert_eq!(child.borrow_mut().assign("c", Value::Number(2.0)),
                   Err(ErrorKind::ConstantAssignment(String::from("c"))));
        assert_eq!(global.borrow().lookup("c"), Ok(Value::Number(1.0)));
    }

    #[test]
    pub fn test_child_constant_does_not_affect_parent_variable() {
        let global = Environment::new_global();
        global.borrow_mut().declare("x", Value::Number(1.0), false).unwrap();

        let child = Environment::new_with_parent(Rc::clone(&global));
        child.borrow_mut().declare("x", Value::Number(2.0), true).unwrap();

        assert!(global.borrow_mut().assign("x", Value::Number(3.0)).is_ok());
        assert!(child.borrow_mut().assign("x", Value::Number(4.0)).is_err());
    }

    #[test]
    pub fn test_unresolved() {
        let global = Environment::new_global();
        let child = Environment::new_with_parent(Rc::clone(&global));

        assert_eq!(child.borrow_mut().assign("missing", Value::Null),
                   Err(ErrorKind::Unresolved(String::from("missing"))));
        assert_eq!(child.borrow().lookup("missing"),
                   Err(ErrorKind::Unresolved(String::from("missing"))));
    }
}
