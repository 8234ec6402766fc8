//! FB2 genre codes and their display names

pub(super) const GENRES: &[(&str, &str)] = &[
    // Fantasy and science fiction
    ("sf", "Научная фантастика"),
    ("sf_history", "Альтернативная история"),
    ("sf_action", "Боевая фантастика"),
    ("sf_epic", "Эпическая фантастика"),
    ("sf_heroic", "Героическая фантастика"),
    ("sf_detective", "Детективная фантастика"),
    ("sf_cyberpunk", "Киберпанк"),
    ("sf_space", "Космическая фантастика"),
    ("sf_social", "Социальная фантастика"),
    ("sf_horror", "Ужасы и мистика"),
    ("sf_humor", "Юмористическая фантастика"),
    ("sf_fantasy", "Фэнтези"),
    ("sf_fantasy_city", "Городское фэнтези"),
    ("sf_postapocalyptic", "Постапокалипсис"),
    ("sf_stimpank", "Стимпанк"),
    ("sf_etc", "Фантастика"),
    ("popadanec", "Попаданцы"),
    ("hronoopera", "Хроноопера"),
    ("litrpg", "ЛитРПГ"),
    // Detectives and thrillers
    ("det_classic", "Классический детектив"),
    ("det_police", "Полицейский детектив"),
    ("det_action", "Боевик"),
    ("det_irony", "Иронический детектив"),
    ("det_history", "Исторический детектив"),
    ("det_espionage", "Шпионский детектив"),
    ("det_crime", "Криминальный детектив"),
    ("det_political", "Политический детектив"),
    ("det_maniac", "Маньяки"),
    ("det_hard", "Крутой детектив"),
    ("thriller", "Триллер"),
    ("detective", "Детектив"),
    // Prose
    ("prose_classic", "Классическая проза"),
    ("prose_history", "Историческая проза"),
    ("prose_contemporary", "Современная проза"),
    ("prose_counter", "Контркультура"),
    ("prose_rus_classic", "Русская классическая проза"),
    ("prose_su_classics", "Советская классическая проза"),
    ("prose_military", "Проза о войне"),
    ("prose", "Проза"),
    ("aphorisms", "Афоризмы"),
    ("essay", "Эссе"),
    ("story", "Рассказ"),
    // Romance
    ("love_contemporary", "Современные любовные романы"),
    ("love_history", "Исторические любовные романы"),
    ("love_detective", "Остросюжетные любовные романы"),
    ("love_short", "Короткие любовные романы"),
    ("love_erotica", "Эротика"),
    ("love_sf", "Любовное фэнтези"),
    ("love", "Любовные романы"),
    // Adventure
    ("adv_western", "Вестерн"),
    ("adv_history", "Исторические приключения"),
    ("adv_indian", "Приключения про индейцев"),
    ("adv_maritime", "Морские приключения"),
    ("adv_geo", "Путешествия и география"),
    ("adv_animal", "Природа и животные"),
    ("adventure", "Приключения"),
    // Children
    ("child_tale", "Сказка"),
    ("child_verse", "Детские стихи"),
    ("child_prose", "Детская проза"),
    ("child_sf", "Детская фантастика"),
    ("child_det", "Детские остросюжетные"),
    ("child_adv", "Детские приключения"),
    ("child_education", "Детская образовательная литература"),
    ("children", "Детская литература"),
    // Poetry and drama
    ("poetry", "Поэзия"),
    ("dramaturgy", "Драматургия"),
    // Antique
    ("antique_ant", "Античная литература"),
    ("antique_european", "Европейская старинная литература"),
    ("antique_russian", "Древнерусская литература"),
    ("antique_east", "Древневосточная литература"),
    ("antique_myths", "Мифы. Легенды. Эпос"),
    ("antique", "Старинная литература"),
    // Science and education
    ("sci_history", "История"),
    ("sci_psychology", "Психология"),
    ("sci_culture", "Культурология"),
    ("sci_religion", "Религиоведение"),
    ("sci_philosophy", "Философия"),
    ("sci_politics", "Политика"),
    ("sci_business", "Деловая литература"),
    ("sci_juris", "Юриспруденция"),
    ("sci_linguistic", "Языкознание"),
    ("sci_medicine", "Медицина"),
    ("sci_phys", "Физика"),
    ("sci_math", "Математика"),
    ("sci_chem", "Химия"),
    ("sci_biology", "Биология"),
    ("sci_tech", "Технические науки"),
    ("sci_economy", "Экономика"),
    ("science", "Научная литература"),
    // Computers
    ("comp_www", "Интернет"),
    ("comp_programming", "Программирование"),
    ("comp_hard", "Компьютерное железо"),
    ("comp_soft", "Программы"),
    ("comp_db", "Базы данных"),
    ("comp_osnet", "ОС и сети"),
    ("computers", "Компьютерная литература"),
    // Reference
    ("ref_encyc", "Энциклопедии"),
    ("ref_dict", "Словари"),
    ("ref_ref", "Справочники"),
    ("ref_guide", "Руководства"),
    ("reference", "Справочная литература"),
    // Nonfiction
    ("nonf_biography", "Биографии и мемуары"),
    ("nonf_publicism", "Публицистика"),
    ("nonf_criticism", "Критика"),
    ("design", "Искусство и дизайн"),
    ("nonfiction", "Документальная литература"),
    ("military_history", "Военная история"),
    // Religion
    ("religion_rel", "Религия"),
    ("religion_esoterics", "Эзотерика"),
    ("religion_self", "Самосовершенствование"),
    ("religion", "Религиозная литература"),
    // Humor
    ("humor_anecdote", "Анекдоты"),
    ("humor_prose", "Юмористическая проза"),
    ("humor_verse", "Юмористические стихи"),
    ("humor", "Юмор"),
    // Home and family
    ("home_cooking", "Кулинария"),
    ("home_pets", "Домашние животные"),
    ("home_crafts", "Хобби и ремесла"),
    ("home_entertain", "Развлечения"),
    ("home_health", "Здоровье"),
    ("home_garden", "Сад и огород"),
    ("home_diy", "Сделай сам"),
    ("home_sport", "Спорт"),
    ("home_sex", "Эротика и секс"),
    ("home", "Домоводство"),
    // Other
    ("other", "Неотсортированное"),
];
